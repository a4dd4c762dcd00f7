//! PC/SC transport and card monitor
//!
//! This crate provides the PC/SC-backed half of cardwatch: the
//! `CardTransport` implementation from `cardwatch-core` on top of the
//! system PC/SC service, and the [`CardMonitor`] poll/notify loop that
//! blocks until a card is presented, reads its UID and notifies
//! listeners.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cardwatch_core::CardUid;
//! use cardwatch_transport_pcsc::{PcscConfig, PcscDeviceManager};
//!
//! // Create a PC/SC device manager
//! let manager = PcscDeviceManager::new()?;
//!
//! // List available readers
//! let readers = manager.list_readers()?;
//! for reader in &readers {
//!     println!("{} (card present: {})", reader.name(), reader.has_card());
//! }
//!
//! // Watch for presented cards, printing each UID
//! let mut monitor = manager.monitor(PcscConfig::default())?;
//! monitor.add_listener(|uid: &CardUid| {
//!     println!("Card presented: {uid}");
//! });
//! monitor.watch()?;
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

// Core modules
mod config;
mod error;
pub mod event;
mod manager;
mod monitor;
mod reader;
mod transport;

// Public exports
pub use config::{PcscConfig, ShareMode};
pub use error::PcscError;
pub use event::CardEvent;
pub use manager::PcscDeviceManager;
pub use monitor::{CardMonitor, WatchHandle};
pub use reader::PcscReader;
pub use transport::PcscTransport;

// Re-export some pcsc types for convenience
pub use pcsc::{Protocol, Protocols};
