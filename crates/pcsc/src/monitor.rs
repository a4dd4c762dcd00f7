//! Card monitor: the blocking poll/notify loop
//!
//! The monitor blocks on the PC/SC status-change wait until a card is
//! presented in some reader, reads the card's UID with the GET DATA
//! command, and notifies registered listeners. A card left on the
//! reader is reported once per presentation; removing it re-arms the
//! reader.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use pcsc::{Context, PNP_NOTIFICATION, ReaderState, Scope, State};
use tracing::{debug, info, warn};

use cardwatch_core::{CardListener, CardUid, Error, ListenerSet};

use crate::config::PcscConfig;
use crate::error::PcscError;
use crate::event::{CardEvent, CardEventReceiver, CardEventSender, card_event_channel};
use crate::reader::card_present;
use crate::transport::PcscTransport;

/// Granularity of a single status-change wait; bounds how long a stop
/// request can go unnoticed while blocked in PC/SC.
const WAIT_SLICE: Duration = Duration::from_secs(1);

/// A presence transition on one reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// A card appeared (or a different card replaced the previous one)
    Presented,
    /// The card went away
    Removed,
}

/// Compute the presence transition for one reader
///
/// `was_present` is what we saw last round (`None` for a reader we have
/// never observed); `present_now` is the current state. A card that
/// stays on the reader produces no edge.
const fn presence_edge(was_present: Option<bool>, present_now: bool) -> Option<Edge> {
    match (was_present, present_now) {
        (Some(true), true) => None,
        (_, true) => Some(Edge::Presented),
        (Some(true), false) => Some(Edge::Removed),
        (_, false) => None,
    }
}

fn is_dead(rs: &ReaderState) -> bool {
    rs.event_state().intersects(State::UNKNOWN | State::IGNORE)
}

/// Bound a single status-change wait by the overall deadline
///
/// Returns [`Error::Timeout`] once the deadline has elapsed; otherwise
/// the time to spend in the next wait, clamped to [`WAIT_SLICE`].
fn wait_slice(deadline: Option<Instant>) -> Result<Duration, Error> {
    match deadline {
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::Timeout);
            }
            Ok(remaining.min(WAIT_SLICE))
        }
        None => Ok(WAIT_SLICE),
    }
}

/// Monitor that watches readers and notifies listeners of presented cards
#[allow(missing_debug_implementations)]
pub struct CardMonitor {
    /// PC/SC context
    context: Context,
    /// Connection and loop configuration
    config: PcscConfig,
    /// Listeners notified with each presented card's UID
    listeners: ListenerSet,
    /// Cleared to request the watch loop to exit
    running: Arc<AtomicBool>,
    /// Last observed card presence per reader
    presence: HashMap<String, bool>,
    /// When set, only this reader is watched
    reader_filter: Option<String>,
}

impl CardMonitor {
    /// Create a new monitor on an existing context
    pub(crate) fn new(context: Context, config: PcscConfig) -> Self {
        Self {
            context,
            config,
            listeners: ListenerSet::new(),
            running: Arc::new(AtomicBool::new(false)),
            presence: HashMap::new(),
            reader_filter: None,
        }
    }

    /// Restrict the monitor to a single reader by name
    ///
    /// Cards presented in other readers are ignored entirely rather
    /// than reported and filtered by the caller.
    #[must_use]
    pub fn with_reader(mut self, name: impl Into<String>) -> Self {
        self.reader_filter = Some(name.into());
        self
    }

    /// Create a monitor with a dedicated PC/SC context
    pub fn create(config: PcscConfig) -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self::new(context, config))
    }

    /// Register a listener to be notified of presented cards
    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: CardListener + 'static,
    {
        self.listeners.add(listener);
    }

    /// Block until one card is presented and return its reader and UID
    ///
    /// Respects the configured wait timeout; elapsing it returns
    /// [`Error::Timeout`].
    pub fn wait_for_card(&mut self) -> Result<(String, CardUid), Error> {
        self.running.store(true, Ordering::SeqCst);

        // One deadline for the whole call: a stream of present but
        // unreadable cards must not stretch the wait past the timeout.
        let deadline = self.config.wait_timeout.map(|t| Instant::now() + t);

        loop {
            let edges = self.wait_for_edges(deadline)?;
            if edges.is_empty() {
                // Only happens when stop() raced us
                return Err(Error::other("monitor stopped"));
            }

            for (reader, edge) in edges {
                if edge == Edge::Presented {
                    match self.read_uid_from(&reader) {
                        Ok(uid) => return Ok((reader, uid)),
                        Err(e) => {
                            warn!(reader = %reader, error = %e, "failed to read card UID")
                        }
                    }
                }
            }
        }
    }

    /// Run the poll/notify loop on the current thread
    ///
    /// Each round blocks until a card is presented, reads its UID,
    /// notifies listeners when a UID was actually obtained, then sleeps
    /// the configured poll interval before rescheduling the wait. The
    /// loop only returns with an error; a wait timeout surfaces as
    /// [`Error::Timeout`], which callers treat as fatal.
    pub fn watch(&mut self) -> Result<(), Error> {
        self.running.store(true, Ordering::SeqCst);
        self.watch_loop(None)
    }

    /// Run the poll/notify loop on a background thread
    ///
    /// The producer thread performs the blocking wait and UID read and
    /// delivers [`CardEvent`]s over a channel; the consuming thread
    /// drains the channel at its own pace. Registered listeners are
    /// still invoked, on the producer thread.
    pub fn spawn(mut self) -> WatchHandle {
        let (sender, events) = card_event_channel();
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        let handle = thread::spawn(move || self.watch_loop(Some(sender)));

        WatchHandle {
            events,
            running,
            handle,
        }
    }

    /// Request the watch loop to exit
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn watch_loop(&mut self, sender: Option<CardEventSender>) -> Result<(), Error> {
        info!("watching for presented cards");

        while self.running.load(Ordering::SeqCst) {
            // Each round gets a fresh wait bound; the timeout limits
            // how long a single wait may go without card activity.
            let deadline = self.config.wait_timeout.map(|t| Instant::now() + t);
            let edges = self.wait_for_edges(deadline)?;
            if edges.is_empty() {
                // stop() was called while we were waiting
                break;
            }

            for (reader, edge) in edges {
                match edge {
                    Edge::Presented => match self.read_uid_from(&reader) {
                        Ok(uid) => {
                            info!(reader = %reader, uid = %uid, "card presented");
                            self.listeners.notify(&uid);
                            if let Some(sender) = &sender {
                                let _ = sender.send(CardEvent::Presented { reader, uid });
                            }
                        }
                        // Skip this round; the card may have bounced
                        // off the field before we could connect.
                        Err(e) => {
                            warn!(reader = %reader, error = %e, "failed to read card UID")
                        }
                    },
                    Edge::Removed => {
                        debug!(reader = %reader, "card removed");
                        if let Some(sender) = &sender {
                            let _ = sender.send(CardEvent::Removed { reader });
                        }
                    }
                }
            }

            thread::sleep(self.config.poll_interval);
        }

        Ok(())
    }

    /// Block until some reader changes card presence, returning the edges
    ///
    /// Reader states start `UNAWARE`, so the first wait reports the
    /// current state immediately and a card already on the reader is
    /// seen without an insertion event. Waits are sliced so that both
    /// the deadline and a stop request are honored.
    fn wait_for_edges(&mut self, deadline: Option<Instant>) -> Result<Vec<(String, Edge)>, Error> {
        let mut reader_states = vec![ReaderState::new(PNP_NOTIFICATION(), State::UNAWARE)];

        loop {
            if !self.running.load(Ordering::SeqCst) {
                return Ok(Vec::new());
            }

            // Remove readers that disappeared
            for rs in &reader_states {
                if is_dead(rs) {
                    debug!(reader = ?rs.name(), "reader removed");
                    self.presence.remove(&rs.name().to_string_lossy().into_owned());
                }
            }
            reader_states.retain(|rs| !is_dead(rs));

            // Add newly attached readers
            match self.context.list_readers_owned() {
                Ok(names) => {
                    for name in names {
                        if self
                            .reader_filter
                            .as_deref()
                            .is_some_and(|f| f != name.to_string_lossy())
                        {
                            continue;
                        }
                        if !reader_states.iter().any(|rs| rs.name() == name.as_c_str()) {
                            debug!(reader = ?name, "reader attached");
                            reader_states.push(ReaderState::new(name, State::UNAWARE));
                        }
                    }
                }
                // A transient listing failure is not fatal; PnP will
                // wake us when the reader set changes.
                Err(e) => debug!(error = %e, "failed to list readers"),
            }

            let slice = wait_slice(deadline)?;

            match self.context.get_status_change(Some(slice), &mut reader_states) {
                Ok(()) => {}
                Err(pcsc::Error::Timeout) => continue,
                Err(e) => return Err(PcscError::from(e).into()),
            }

            let mut edges = Vec::new();
            for rs in &mut reader_states {
                if rs.name() == PNP_NOTIFICATION() {
                    rs.sync_current_state();
                    continue;
                }

                let name = rs.name().to_string_lossy().into_owned();
                let present = card_present(rs.event_state());
                if let Some(edge) = presence_edge(self.presence.get(&name).copied(), present) {
                    edges.push((name.clone(), edge));
                }
                self.presence.insert(name, present);
                rs.sync_current_state();
            }

            if !edges.is_empty() {
                return Ok(edges);
            }
        }
    }

    /// Connect to the reader that reported a card and read the UID
    fn read_uid_from(&self, reader: &str) -> Result<CardUid, Error> {
        use cardwatch_core::CardTransport;

        let mut transport =
            PcscTransport::new(self.context.clone(), reader, self.config.clone())?;
        transport.read_uid()
    }
}

/// Handle to a monitor running on a background thread
#[allow(missing_debug_implementations)]
pub struct WatchHandle {
    events: CardEventReceiver,
    running: Arc<AtomicBool>,
    handle: thread::JoinHandle<Result<(), Error>>,
}

impl WatchHandle {
    /// Channel of card events produced by the monitor thread
    pub const fn events(&self) -> &CardEventReceiver {
        &self.events
    }

    /// Request the monitor thread to exit
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Wait for the monitor thread to finish and return its result
    pub fn join(self) -> Result<(), Error> {
        self.handle
            .join()
            .unwrap_or_else(|_| Err(Error::other("watch thread panicked")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_edges() {
        // First sighting with a card: report it
        assert_eq!(presence_edge(None, true), Some(Edge::Presented));
        // First sighting without a card: nothing
        assert_eq!(presence_edge(None, false), None);
        // Card stays on the reader: report once only
        assert_eq!(presence_edge(Some(true), true), None);
        // Card removed
        assert_eq!(presence_edge(Some(true), false), Some(Edge::Removed));
        // Reader stays empty
        assert_eq!(presence_edge(Some(false), false), None);
        // Removal re-arms the reader for the same card
        assert_eq!(presence_edge(Some(false), true), Some(Edge::Presented));
    }

    #[test]
    fn test_wait_slice_deadlines() {
        // No deadline: every wait uses the fixed slice
        assert_eq!(wait_slice(None), Ok(WAIT_SLICE));

        // A distant deadline is clamped to the slice
        let far = Instant::now() + Duration::from_secs(600);
        assert_eq!(wait_slice(Some(far)), Ok(WAIT_SLICE));

        // A near deadline bounds the wait by what remains of it
        let near = Instant::now() + Duration::from_millis(500);
        match wait_slice(Some(near)) {
            Ok(slice) => assert!(slice < WAIT_SLICE),
            Err(e) => panic!("unexpected error: {e:?}"),
        }

        // An elapsed deadline is the timeout, however often it is asked
        let past = Instant::now() - Duration::from_millis(1);
        assert_eq!(wait_slice(Some(past)), Err(Error::Timeout));
        assert_eq!(wait_slice(Some(past)), Err(Error::Timeout));
    }
}
