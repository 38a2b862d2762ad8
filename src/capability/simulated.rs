//! In-memory location capability for tests.
//!
//! [`SimulatedCapability`] is a cloneable handle: hand one clone to the
//! facade and keep another to emit synthetic events and inspect what the
//! facade asked for. Like a real platform service, it keeps the sink it was
//! started with after `stop`, so late events still reach the facade (which
//! must drop them).
//!
//! Only available with the `test-utils` feature. DO NOT use in production.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{CapabilityError, CapabilityEvent, CapabilityResult, EventSink, LocationCapability};
use crate::location::{AuthorizationStatus, LocationSettings, Position};

#[derive(Debug, Default)]
struct SimulatedState {
    configured: Vec<LocationSettings>,
    start_count: usize,
    stop_count: usize,
    started: bool,
    sink: Option<EventSink>,
    authorization: AuthorizationStatus,
    fail_next_start: Option<CapabilityError>,
    fail_next_configure: Option<CapabilityError>,
}

/// Scriptable test double for [`LocationCapability`].
///
/// # Example
///
/// ```
/// use location_facade::capability::SimulatedCapability;
/// use location_facade::location::Position;
/// use location_facade::LocationFacade;
///
/// let capability = SimulatedCapability::new();
/// let facade = LocationFacade::new(capability.clone());
///
/// facade.start_location_updates();
/// capability.emit_position(Position::new(46.0569, 14.5058).unwrap());
///
/// assert_eq!(facade.current_position().unwrap().latitude(), 46.0569);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedCapability {
    state: Arc<Mutex<SimulatedState>>,
}

impl SimulatedCapability {
    /// Creates a capability with `NotDetermined` authorization.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a capability reporting the given authorization.
    #[must_use]
    pub fn with_authorization(status: AuthorizationStatus) -> Self {
        let capability = Self::new();
        capability.lock().authorization = status;
        capability
    }

    fn lock(&self) -> MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Emits an event through the sink. Returns true if the facade
    /// forwarded it, false if it was dropped or no sink was ever attached.
    pub fn emit(&self, event: CapabilityEvent) -> bool {
        // Clone the sink out so the facade never runs under our lock.
        let sink = self.lock().sink.clone();
        sink.is_some_and(|sink| sink.deliver(event))
    }

    /// Emits a position fix.
    pub fn emit_position(&self, position: Position) -> bool {
        self.emit(CapabilityEvent::PositionUpdate(position))
    }

    /// Emits a delivery failure.
    pub fn emit_failure(&self, description: impl Into<String>) -> bool {
        self.emit(CapabilityEvent::Failure(description.into()))
    }

    /// Changes the reported authorization and emits the change.
    pub fn set_authorization(&self, status: AuthorizationStatus) -> bool {
        self.lock().authorization = status;
        self.emit(CapabilityEvent::AuthorizationChanged(status))
    }

    /// Makes the next `start` call fail with `error`.
    pub fn fail_next_start(&self, error: CapabilityError) {
        self.lock().fail_next_start = Some(error);
    }

    /// Makes the next `configure` call fail with `error`.
    pub fn fail_next_configure(&self, error: CapabilityError) {
        self.lock().fail_next_configure = Some(error);
    }

    /// Every settings value successfully applied, oldest first.
    #[must_use]
    pub fn configured(&self) -> Vec<LocationSettings> {
        self.lock().configured.clone()
    }

    /// The most recently applied settings.
    #[must_use]
    pub fn last_settings(&self) -> Option<LocationSettings> {
        self.lock().configured.last().copied()
    }

    /// Number of successful `start` calls.
    #[must_use]
    pub fn start_count(&self) -> usize {
        self.lock().start_count
    }

    /// Number of `stop` calls.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.lock().stop_count
    }

    /// Returns true between a successful `start` and the next `stop`.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.lock().started
    }
}

impl LocationCapability for SimulatedCapability {
    fn configure(&mut self, settings: &LocationSettings) -> CapabilityResult<()> {
        let mut state = self.lock();
        if let Some(error) = state.fail_next_configure.take() {
            return Err(error);
        }
        state.configured.push(*settings);
        Ok(())
    }

    fn start(&mut self, sink: EventSink) -> CapabilityResult<()> {
        let mut state = self.lock();
        if let Some(error) = state.fail_next_start.take() {
            return Err(error);
        }
        state.start_count += 1;
        state.started = true;
        state.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.lock();
        state.stop_count += 1;
        state.started = false;
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        self.lock().authorization
    }
}
