//! The location capability seam.
//!
//! A [`LocationCapability`] is whatever actually produces positions: the
//! host platform's location service in an application, or
//! [`SimulatedCapability`] in tests. The facade owns exactly one capability
//! and talks to it only through this trait.
//!
//! # Event flow
//!
//! ```text
//! platform thread(s)
//!     │  CapabilityEvent
//!     ▼
//! EventSink::deliver
//!     │  (drops events while stopped)
//!     ▼
//! cached position + broadcast
//!     │  LocationEvent
//!     ▼
//! Subscription(s)
//! ```

mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod simulated;

use std::sync::Arc;

pub use error::{CapabilityError, CapabilityResult};
#[cfg(any(test, feature = "test-utils"))]
pub use simulated::SimulatedCapability;

use crate::facade::relay::EventRelay;
use crate::location::{AuthorizationStatus, LocationSettings, Position};

/// Something the location capability reports asynchronously.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityEvent {
    /// A new position fix.
    PositionUpdate(Position),
    /// The capability could not produce a position (signal lost, ...).
    Failure(String),
    /// The user or the platform changed the location permission.
    AuthorizationChanged(AuthorizationStatus),
}

/// Access to a device location service.
///
/// Implementations wrap a platform API. `configure` may be called while
/// updates are active; implementations must apply the new settings to the
/// running session rather than starting a second one.
pub trait LocationCapability: Send {
    /// Applies acquisition settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be applied.
    fn configure(&mut self, settings: &LocationSettings) -> CapabilityResult<()>;

    /// Begins producing events into `sink`.
    ///
    /// Events may be delivered from any thread, before or after this call
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the service refuses to start.
    fn start(&mut self, sink: EventSink) -> CapabilityResult<()>;

    /// Stops producing events.
    fn stop(&mut self);

    /// Current location permission.
    fn authorization_status(&self) -> AuthorizationStatus;
}

/// Handle through which a capability delivers events to the facade.
///
/// Cheap to clone and safe to use from any thread. Events delivered while
/// the facade is stopped are discarded, authorization changes included: a
/// permission change before the first start or after a stop is not
/// broadcast. Query [`LocationCapability::authorization_status`] through
/// the facade for the current value instead.
///
/// Events delivered from inside [`LocationCapability::start`] are held
/// until the start returns. They are forwarded if it succeeds and discarded
/// if it fails.
#[derive(Clone)]
pub struct EventSink {
    relay: Arc<EventRelay>,
}

impl EventSink {
    pub(crate) const fn new(relay: Arc<EventRelay>) -> Self {
        Self { relay }
    }

    /// Delivers an event. Returns false if it was dropped because the facade
    /// is stopped.
    pub fn deliver(&self, event: CapabilityEvent) -> bool {
        self.relay.relay(event)
    }

    /// Delivers a new position fix.
    pub fn deliver_position(&self, position: Position) -> bool {
        self.deliver(CapabilityEvent::PositionUpdate(position))
    }

    /// Delivers a failure description.
    pub fn deliver_failure(&self, description: impl Into<String>) -> bool {
        self.deliver(CapabilityEvent::Failure(description.into()))
    }

    /// Delivers an authorization change.
    pub fn deliver_authorization(&self, status: AuthorizationStatus) -> bool {
        self.deliver(CapabilityEvent::AuthorizationChanged(status))
    }

    /// Returns true while the facade is accepting events.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.relay.is_accepting()
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::LocationEvent;

    fn sink() -> (Arc<EventRelay>, EventSink) {
        let relay = Arc::new(EventRelay::new(8));
        (Arc::clone(&relay), EventSink::new(relay))
    }

    #[test]
    fn sink_drops_events_while_stopped() {
        let (relay, sink) = sink();
        let mut rx = relay.subscribe();

        assert!(!sink.is_active());
        assert!(!sink.deliver_failure("no signal"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sink_forwards_events_while_running() {
        let (relay, sink) = sink();
        let mut rx = relay.subscribe();
        relay.begin_start();
        relay.commit_start();

        assert!(sink.is_active());
        assert!(sink.deliver_authorization(AuthorizationStatus::Denied));
        assert_eq!(
            rx.try_recv().unwrap(),
            LocationEvent::AuthorizationChanged(AuthorizationStatus::Denied)
        );
    }

    #[test]
    fn authorization_change_before_first_start_is_dropped() {
        let (relay, sink) = sink();
        let mut rx = relay.subscribe();

        assert!(!sink.deliver_authorization(AuthorizationStatus::AuthorizedAlways));
        assert!(rx.try_recv().is_err());

        relay.begin_start();
        relay.commit_start();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sink_is_active_while_starting() {
        let (relay, sink) = sink();
        relay.begin_start();

        assert!(sink.is_active());
        assert!(sink.deliver_failure("warming up"));

        relay.abort_start();
        assert!(!sink.is_active());
    }

    #[test]
    fn sink_debug_shows_activity() {
        let (_relay, sink) = sink();
        assert_eq!(format!("{sink:?}"), "EventSink { active: false }");
    }
}
