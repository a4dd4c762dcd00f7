//! Event types and channels for the card monitor

use cardwatch_core::CardUid;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Events emitted by the card monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEvent {
    /// A card was presented and its UID read
    Presented {
        /// Reader name
        reader: String,
        /// UID of the presented card
        uid: CardUid,
    },
    /// The card was removed from a reader
    Removed {
        /// Reader name
        reader: String,
    },
}

/// Sender for card events
pub type CardEventSender = Sender<CardEvent>;
/// Receiver for card events
pub type CardEventReceiver = Receiver<CardEvent>;

/// Create an unbounded channel for card events
pub fn card_event_channel() -> (CardEventSender, CardEventReceiver) {
    unbounded()
}
