//! Configuration options for the PC/SC transport and monitor

use std::time::Duration;

use pcsc::{Protocols as PcscProtocols, ShareMode as PcscShareMode};

/// Sharing mode for card connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMode {
    /// Exclusive access to the card
    Exclusive,
    /// Shared access to the card (default)
    Shared,
    /// Direct connection to the reader
    Direct,
}

impl From<ShareMode> for PcscShareMode {
    fn from(mode: ShareMode) -> Self {
        match mode {
            ShareMode::Exclusive => Self::Exclusive,
            ShareMode::Shared => Self::Shared,
            ShareMode::Direct => Self::Direct,
        }
    }
}

/// Configuration options for PC/SC connections and the watch loop
#[derive(Debug, Clone)]
pub struct PcscConfig {
    /// Sharing mode for card connections
    pub share_mode: ShareMode,

    /// Preferred protocols for card communication
    pub protocols: PcscProtocols,

    /// Automatically reconnect if the card is reset
    pub auto_reconnect: bool,

    /// Delay between poll rounds after an event was handled
    pub poll_interval: Duration,

    /// Upper bound on a single wait for a card; `None` waits forever
    ///
    /// Elapsing is fatal to the watch loop: it surfaces as the core
    /// `Timeout` error.
    pub wait_timeout: Option<Duration>,
}

impl Default for PcscConfig {
    fn default() -> Self {
        Self {
            share_mode: ShareMode::Shared,
            protocols: PcscProtocols::ANY,
            auto_reconnect: true,
            poll_interval: Duration::from_millis(500),
            wait_timeout: None,
        }
    }
}

impl PcscConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sharing mode
    pub const fn with_share_mode(mut self, mode: ShareMode) -> Self {
        self.share_mode = mode;
        self
    }

    /// Set the preferred protocols
    pub const fn with_protocols(mut self, protocols: PcscProtocols) -> Self {
        self.protocols = protocols;
        self
    }

    /// Set whether to automatically reconnect
    pub const fn with_auto_reconnect(mut self, auto_reconnect: bool) -> Self {
        self.auto_reconnect = auto_reconnect;
        self
    }

    /// Set the delay between poll rounds
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bound each wait for a card; `None` waits forever
    pub const fn with_wait_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.wait_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = PcscConfig::new()
            .with_share_mode(ShareMode::Exclusive)
            .with_poll_interval(Duration::from_millis(100))
            .with_wait_timeout(Some(Duration::from_secs(30)));

        assert_eq!(config.share_mode, ShareMode::Exclusive);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.wait_timeout, Some(Duration::from_secs(30)));
        assert!(config.auto_reconnect);
    }
}
