//! Event relay between the capability and subscribers.
//!
//! The relay owns the cached position and the session phase behind one
//! mutex. Checking the phase, replacing the cache and publishing the
//! broadcast all happen under that lock, so:
//!
//! - a subscriber never sees `Updated(p)` before `current_position()` is `p`
//! - deliveries from several platform threads never interleave
//! - once `stop()` returns, nothing more is forwarded
//!
//! Events that arrive while the capability is still starting are held back
//! and only applied if the start succeeds.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use super::events::LocationEvent;
use crate::capability::CapabilityEvent;
use crate::location::Position;

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Stopped,
    Starting(Vec<CapabilityEvent>),
    Running,
}

#[derive(Debug, Default)]
struct RelayState {
    phase: Phase,
    current: Option<Position>,
}

pub struct EventRelay {
    state: Mutex<RelayState>,
    tx: broadcast::Sender<LocationEvent>,
}

impl EventRelay {
    /// Creates a stopped relay. `capacity` must be non-zero.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            state: Mutex::new(RelayState::default()),
            tx,
        }
    }

    // State is replaced whole, so a poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, RelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Begins a session. Events delivered from now on are buffered until
    /// [`commit_start`](Self::commit_start) or [`abort_start`](Self::abort_start).
    pub fn begin_start(&self) {
        let mut state = self.lock();
        if matches!(state.phase, Phase::Stopped) {
            state.phase = Phase::Starting(Vec::new());
        }
    }

    /// Marks the session running and applies any buffered events in order.
    pub fn commit_start(&self) {
        let mut state = self.lock();
        let buffered = match std::mem::replace(&mut state.phase, Phase::Running) {
            Phase::Starting(buffered) => buffered,
            Phase::Stopped | Phase::Running => Vec::new(),
        };
        for event in buffered {
            self.apply(&mut state, event);
        }
    }

    /// Abandons a session that failed to start. Buffered events are
    /// discarded and the cache is left as it was.
    pub fn abort_start(&self) {
        let mut state = self.lock();
        if let Phase::Starting(buffered) = std::mem::take(&mut state.phase) {
            if !buffered.is_empty() {
                log::debug!(
                    "Discarding {} location events from failed start",
                    buffered.len()
                );
            }
        }
    }

    /// Ends the session. Returns true if one was active.
    pub fn stop(&self) -> bool {
        let mut state = self.lock();
        !matches!(std::mem::take(&mut state.phase), Phase::Stopped)
    }

    /// Returns true once a session has started successfully.
    pub fn is_running(&self) -> bool {
        matches!(self.lock().phase, Phase::Running)
    }

    /// Returns true while events are being accepted (starting or running).
    pub fn is_accepting(&self) -> bool {
        !matches!(self.lock().phase, Phase::Stopped)
    }

    pub fn current_position(&self) -> Option<Position> {
        self.lock().current
    }

    /// Accepts a capability event. Returns false if the relay is stopped.
    pub fn relay(&self, event: CapabilityEvent) -> bool {
        let mut state = self.lock();
        if let Phase::Starting(buffered) = &mut state.phase {
            buffered.push(event);
            return true;
        }
        if matches!(state.phase, Phase::Stopped) {
            log::debug!("Dropping location event while stopped: {event:?}");
            return false;
        }
        self.apply(&mut state, event);
        true
    }

    // Caller holds the state lock.
    fn apply(&self, state: &mut RelayState, event: CapabilityEvent) {
        let broadcast = match event {
            CapabilityEvent::PositionUpdate(position) => {
                state.current = Some(position);
                LocationEvent::Updated(position)
            }
            CapabilityEvent::Failure(description) => {
                log::warn!("Location delivery failed: {description}");
                LocationEvent::Failed(description)
            }
            CapabilityEvent::AuthorizationChanged(status) => {
                log::info!("Location authorization changed to {status:?}");
                LocationEvent::AuthorizationChanged(status)
            }
        };
        self.publish(broadcast);
    }

    /// Broadcasts a failure regardless of the session phase. Used for errors
    /// raised by the facade itself while starting or reconfiguring.
    pub fn publish_failure(&self, description: String) {
        let _state = self.lock();
        self.publish(LocationEvent::Failed(description));
    }

    // Caller holds the state lock.
    fn publish(&self, event: LocationEvent) {
        let topic = event.topic();
        match self.tx.send(event) {
            Ok(receivers) => log::debug!("Published {topic} to {receivers} subscribers"),
            Err(_) => log::debug!("Published {topic} with no subscribers"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LocationEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
