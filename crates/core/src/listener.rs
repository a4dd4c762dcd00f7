//! Listener interface for card presentations
//!
//! A listener is notified with the UID of each presented card. Closures
//! implement the trait, so registering an observer is one line.

use crate::uid::CardUid;

/// Observer notified when a card is presented
pub trait CardListener: Send {
    /// Called with the UID of the presented card
    fn card_presented(&mut self, uid: &CardUid);
}

// Implement the listener trait for closures
impl<F> CardListener for F
where
    F: FnMut(&CardUid) + Send,
{
    fn card_presented(&mut self, uid: &CardUid) {
        self(uid)
    }
}

/// An owning collection of listeners that fans a UID out to all of them
#[allow(missing_debug_implementations)]
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Box<dyn CardListener>>,
}

impl ListenerSet {
    /// Create an empty listener set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add<L>(&mut self, listener: L)
    where
        L: CardListener + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify every listener of a presented card
    pub fn notify(&mut self, uid: &CardUid) {
        for listener in &mut self.listeners {
            listener.card_presented(uid);
        }
    }

    /// Remove all listeners
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
