//! PC/SC transport implementation

use bytes::Bytes;
use cardwatch_core::prelude::*;

use pcsc::{Card, Context, Disposition};
use std::{ffi::CString, fmt};
use tracing::{trace, warn};

use crate::{config::PcscConfig, error::PcscError};

/// Transport implementation using PC/SC
pub struct PcscTransport {
    /// PC/SC context
    context: Context,
    /// Card connection, if established
    card: Option<Card>,
    /// Reader name
    reader_name: String,
    /// Configuration
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Create a new PC/SC transport for the specified reader
    pub(crate) fn new(
        context: Context,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<Self, PcscError> {
        let reader_name = reader_name.to_string();

        let mut transport = Self {
            context,
            card: None,
            reader_name,
            config,
        };

        // Connect eagerly if a card is already present; a missing card
        // is not an error until someone transmits.
        let _ = transport.connect_card();

        Ok(transport)
    }

    /// Try to connect to the card
    fn connect_card(&mut self) -> Result<(), PcscError> {
        if self.card.is_some() {
            return Ok(());
        }

        let reader_cstr = CString::new(self.reader_name.clone())
            .map_err(|_| PcscError::ReaderNotFound(self.reader_name.clone()))?;

        match self.context.connect(
            &reader_cstr,
            self.config.share_mode.into(),
            self.config.protocols,
        ) {
            Ok(card) => {
                trace!(reader = %self.reader_name, "connected to card");
                self.card = Some(card);
                Ok(())
            }
            Err(pcsc::Error::NoSmartcard) => Err(PcscError::NoCard(self.reader_name.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the reader name
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// Check if the transport is connected to a card
    pub const fn has_card(&self) -> bool {
        self.card.is_some()
    }

    /// Transmit a command to the card
    fn transmit_command(&mut self, command: &[u8]) -> Result<Bytes, PcscError> {
        // Connect if needed
        self.connect_card()?;

        let card = match &mut self.card {
            Some(card) => card,
            None => return Err(PcscError::NoCard(self.reader_name.clone())),
        };

        // Short APDU responses fit 256 data bytes plus the status word
        let mut response_buffer = [0u8; 258];

        trace!(command = ?command, "transmit");
        match card.transmit(command, &mut response_buffer) {
            Ok(response) => Ok(Bytes::copy_from_slice(response)),
            Err(e) => {
                // If the card was reset or removed, clear our reference
                if matches!(e, pcsc::Error::ResetCard | pcsc::Error::RemovedCard) {
                    warn!(reader = %self.reader_name, error = %e, "lost card connection");
                    self.card = None;

                    if self.config.auto_reconnect && e == pcsc::Error::ResetCard {
                        if let Ok(()) = self.connect_card() {
                            // Try again with the new connection
                            return self.transmit_command(command);
                        }
                    }
                }

                Err(e.into())
            }
        }
    }
}

impl CardTransport for PcscTransport {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Error> {
        self.transmit_command(command).map_err(Error::from)
    }

    fn reset(&mut self) -> Result<(), Error> {
        // Disconnect from the card
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::ResetCard);
        }

        // Try to reconnect
        self.connect_card().map_err(Error::from)
    }

    fn is_connected(&self) -> bool {
        self.card.is_some()
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::LeaveCard);
        }
    }
}
