//! Transport layer for card communication
//!
//! This module provides the trait a concrete card service implements.
//! The PC/SC implementation lives in `cardwatch-transport-pcsc`.

use bytes::Bytes;
use std::fmt;

use crate::Error;
use crate::command::Command;
use crate::response::Response;
use crate::uid::CardUid;

/// Trait for card transport connections
///
/// Implementors must provide methods for raw transmit and reset.
pub trait CardTransport: fmt::Debug + Send {
    /// Send a raw APDU command and get the response
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Error>;

    /// Reset the transport
    fn reset(&mut self) -> Result<(), Error>;

    /// Check whether a card connection is currently established
    fn is_connected(&self) -> bool;

    /// Send a [`Command`] and parse the status word off the response
    fn transmit(&mut self, command: &Command) -> Result<Response, Error> {
        let raw = self.transmit_raw(&command.to_bytes())?;
        Response::from_bytes(&raw)
    }

    /// Retrieve the UID of the currently connected card
    fn read_uid(&mut self) -> Result<CardUid, Error> {
        self.transmit(&Command::get_data_uid())?.into_uid()
    }
}

#[cfg(test)]
pub(crate) use mock::MockTransport;

#[cfg(test)]
mod mock {
    use std::collections::VecDeque;

    use super::*;

    /// Mock transport for testing
    ///
    /// Responses are scripted in order; once the queue is empty every
    /// transmit fails, which lets tests assert how callers handle a
    /// dead card service.
    #[derive(Debug, Default)]
    pub(crate) struct MockTransport {
        responses: VecDeque<Bytes>,
        pub(crate) transmitted: Vec<Vec<u8>>,
    }

    impl MockTransport {
        /// Create a mock that answers every command with `response`, once
        pub(crate) fn with_response(response: Bytes) -> Self {
            let mut mock = Self::default();
            mock.push(response);
            mock
        }

        /// Queue another scripted response
        pub(crate) fn push(&mut self, response: Bytes) {
            self.responses.push_back(response);
        }
    }

    impl CardTransport for MockTransport {
        fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Error> {
            self.transmitted.push(command.to_vec());
            self.responses.pop_front().ok_or(Error::Transmission)
        }

        fn reset(&mut self) -> Result<(), Error> {
            Ok(())
        }

        fn is_connected(&self) -> bool {
            !self.responses.is_empty()
        }
    }
}
