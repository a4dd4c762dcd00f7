//! Core error type
//!
//! All error variants are consolidated here so that the transport and
//! monitor layers can bubble failures up through one type.

use crate::response::StatusWord;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// Failed to transmit data
    #[error("Transmission error: failed to transmit data")]
    Transmission,

    /// Timed out waiting for a card
    ///
    /// The one fatal error of the watch loop: callers terminate on it.
    #[error("Timed out waiting for a card")]
    Timeout,

    /// Parse error when processing a response
    #[error("Parse error: {0}")]
    Parse(&'static str),

    /// The card answered with a non-success status word
    #[error("Card returned status {0}")]
    Status(StatusWord),

    /// Context error with message and source error
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },

    /// Other error with static message
    #[error("{0}")]
    Other(&'static str),

    /// Generic dynamic error with string message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Create a new error with context information
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a new error with a static message
    pub const fn other(message: &'static str) -> Self {
        Self::Other(message)
    }

    /// Create a new error with a dynamic message
    pub fn message<S: Into<String>>(message: S) -> Self {
        Self::Message(message.into())
    }

    /// Create a new parse error
    pub const fn parse(message: &'static str) -> Self {
        Self::Parse(message)
    }

    /// Create a new status error
    pub const fn status(sw1: u8, sw2: u8) -> Self {
        Self::Status(StatusWord::new(sw1, sw2))
    }

    /// Whether this error (or the error it wraps) is the wait timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Context { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

/// Extension trait for Result with cardwatch errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T, Error>;
}

impl<T> ResultExt<T> for Result<T, Error> {
    fn context<S: Into<String>>(self, context: S) -> Self {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wrapping() {
        let err: Result<(), Error> = Err(Error::Timeout);
        let err = err.context("waiting for card").unwrap_err();
        assert_eq!(
            err.to_string(),
            "waiting for card: Timed out waiting for a card"
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn test_status_error_display() {
        let err = Error::status(0x6A, 0x82);
        assert_eq!(err.to_string(), "Card returned status 6A82 (File or data not found)");
        assert!(!err.is_timeout());
    }
}
