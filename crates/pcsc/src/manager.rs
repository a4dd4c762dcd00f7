//! Device manager for PC/SC operations

use pcsc::{Context, Scope};
use tracing::debug;

use crate::config::PcscConfig;
use crate::error::PcscError;
use crate::monitor::CardMonitor;
use crate::reader::PcscReader;
use crate::transport::PcscTransport;

/// Manager for PC/SC device operations
#[allow(missing_debug_implementations)]
pub struct PcscDeviceManager {
    /// PC/SC context
    context: Context,
}

impl PcscDeviceManager {
    /// Create a new PC/SC device manager
    pub fn new() -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        debug!("PC/SC context established");
        Ok(Self { context })
    }

    /// List all available card readers
    pub fn list_readers(&self) -> Result<Vec<PcscReader>, PcscError> {
        let readers = self.context.list_readers_owned()?;
        if readers.is_empty() {
            return Err(PcscError::NoReadersAvailable);
        }

        // For each reader, check if a card is present
        let mut result = Vec::with_capacity(readers.len());

        for reader_name in readers {
            let mut reader_states = vec![pcsc::ReaderState::new(
                reader_name.as_c_str(),
                pcsc::State::UNAWARE,
            )];

            match self.context.get_status_change(None, &mut reader_states) {
                Ok(()) => {
                    result.push(PcscReader::from_reader_state(&reader_states[0]));
                }
                Err(_) => {
                    // If we can't get status, assume no card
                    result.push(PcscReader::new(
                        reader_name.to_string_lossy().into_owned(),
                        false,
                        None,
                    ));
                }
            }
        }

        Ok(result)
    }

    /// Find a reader by name, or the first one with a card when `None`
    pub fn find_reader(&self, name: Option<&str>) -> Result<PcscReader, PcscError> {
        let readers = self.list_readers()?;

        match name {
            Some(name) => readers
                .into_iter()
                .find(|r| r.name() == name)
                .ok_or_else(|| PcscError::ReaderNotFound(name.to_string())),
            None => {
                // Prefer a reader that already has a card; otherwise the
                // first reader, and the monitor waits for a card on it.
                let index = readers.iter().position(|r| r.has_card()).unwrap_or(0);
                readers
                    .into_iter()
                    .nth(index)
                    .ok_or(PcscError::NoReadersAvailable)
            }
        }
    }

    /// Open a connection to a specific reader
    pub fn open_reader(&self, reader_name: &str) -> Result<PcscTransport, PcscError> {
        self.open_reader_with_config(reader_name, PcscConfig::default())
    }

    /// Open a connection to a specific reader with custom configuration
    pub fn open_reader_with_config(
        &self,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<PcscTransport, PcscError> {
        // Clone the context to provide ownership to the transport
        let context = self.context.clone();
        PcscTransport::new(context, reader_name, config)
    }

    /// Create a card monitor sharing this manager's context
    pub fn monitor(&self, config: PcscConfig) -> Result<CardMonitor, PcscError> {
        let context = self.context.clone();
        Ok(CardMonitor::new(context, config))
    }
}
