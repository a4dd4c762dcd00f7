//! Core traits and types for watching card presentations
//!
//! This crate provides the hardware-independent half of cardwatch: the
//! card UID value type, the listener interface notified when a card is
//! presented, the transport seam over which the UID retrieval command
//! travels, and the shared error type.
//!
//! ## Overview
//!
//! A card watcher blocks on a card service until a card is presented,
//! retrieves the card's unique identifier (UID) with a single GET DATA
//! APDU, and notifies registered listeners. This crate contains
//! everything needed to express that flow without naming a specific
//! card service:
//!
//! - [`CardUid`], the identifier read from the card
//! - [`CardListener`] and [`ListenerSet`], the observer interface
//! - [`CardTransport`], the seam a concrete card service implements
//! - [`Command`] and [`Response`], the one APDU exchange we model
//!
//! The PC/SC-backed implementation lives in `cardwatch-transport-pcsc`.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod command;
pub mod error;
pub mod listener;
pub mod response;
pub mod transport;
pub mod uid;

pub use command::Command;
pub use error::{Error, ResultExt};
pub use listener::{CardListener, ListenerSet};
pub use response::{Response, StatusWord};
pub use transport::CardTransport;
pub use uid::CardUid;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{Bytes, BytesMut, Error, ResultExt};

    pub use crate::Command;
    pub use crate::listener::{CardListener, ListenerSet};
    pub use crate::response::{Response, StatusWord};
    pub use crate::transport::CardTransport;
    pub use crate::uid::CardUid;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test the basic types are re-exported correctly
    #[test]
    fn test_reexports() {
        let cmd = Command::get_data_uid();
        assert_eq!(cmd.to_bytes().as_ref(), &[0xFF, 0xCA, 0x00, 0x00, 0x00]);

        let resp = Response::from_bytes(&[0x04, 0xA2, 0x90, 0x00]).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
    }
}
