//! The location facade.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::config::FacadeConfig;
use super::events::{Subscription, Topic};
use super::relay::EventRelay;
use crate::capability::{EventSink, LocationCapability};
use crate::location::{
    distance_kilometers, AuthorizationStatus, LocationResult, LocationSettings, Position,
};

/// Whether location updates are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacadeState {
    /// No updates requested (initial state).
    #[default]
    Stopped,
    /// Updates requested from the capability.
    Running,
}

struct CapabilitySlot {
    capability: Box<dyn LocationCapability>,
    settings: Option<LocationSettings>,
}

/// Convenience layer over a device location capability.
///
/// The facade owns one capability, caches the last position it delivered
/// and re-broadcasts its events to any number of subscribers. Construct it
/// once and pass it (or an `Arc` of it) to whoever needs location data; see
/// [`LocationFacade::shared_or_init`] for a process-wide instance.
///
/// All methods take `&self` and may be called from any thread. Do not call
/// back into the facade from inside [`with_capability`](Self::with_capability).
///
/// # Example
///
/// ```
/// use location_facade::capability::SimulatedCapability;
/// use location_facade::facade::LocationEvent;
/// use location_facade::location::Position;
/// use location_facade::LocationFacade;
///
/// let capability = SimulatedCapability::new();
/// let facade = LocationFacade::new(capability.clone());
/// let mut updates = facade.subscribe();
///
/// facade.start_location_updates();
/// let ljubljana = Position::new(46.0569, 14.5058).unwrap();
/// capability.emit_position(ljubljana);
///
/// assert_eq!(facade.current_position(), Some(ljubljana));
/// assert_eq!(updates.try_recv(), Some(LocationEvent::Updated(ljubljana)));
/// assert_eq!(facade.distance_kilometers_from_current(&ljubljana), Some(0.0));
///
/// facade.stop_location_updates();
/// ```
pub struct LocationFacade {
    slot: Mutex<CapabilitySlot>,
    relay: Arc<EventRelay>,
    config: FacadeConfig,
}

impl LocationFacade {
    /// Creates a stopped facade around `capability` with default
    /// configuration.
    pub fn new(capability: impl LocationCapability + 'static) -> Self {
        Self::build(Box::new(capability), FacadeConfig::default())
    }

    /// Creates a stopped facade with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn with_config(
        capability: impl LocationCapability + 'static,
        config: FacadeConfig,
    ) -> LocationResult<Self> {
        config.validate()?;
        Ok(Self::build(Box::new(capability), config))
    }

    fn build(capability: Box<dyn LocationCapability>, config: FacadeConfig) -> Self {
        Self {
            slot: Mutex::new(CapabilitySlot {
                capability,
                settings: None,
            }),
            relay: Arc::new(EventRelay::new(config.event_capacity)),
            config,
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, CapabilitySlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts updates with the configured default settings.
    pub fn start_location_updates(&self) {
        self.start_location_updates_with(self.config.default_settings);
    }

    /// Starts updates with explicit settings, or reconfigures the running
    /// capability if updates are already active.
    ///
    /// Never fails from the caller's point of view: invalid settings and
    /// capability errors are broadcast as `location.failed` events. A
    /// capability that refuses to start leaves the facade stopped, and any
    /// events it delivered before refusing are discarded.
    pub fn start_location_updates_with(&self, settings: LocationSettings) {
        let mut slot = self.lock_slot();

        if let Err(e) = settings.validate() {
            log::warn!("Refusing to start location updates: {e}");
            self.relay.publish_failure(e.to_string());
            return;
        }

        if let Err(e) = slot.capability.configure(&settings) {
            log::warn!("Location capability rejected settings: {e}");
            self.relay.publish_failure(e.to_string());
            return;
        }
        slot.settings = Some(settings);

        if self.relay.is_running() {
            log::info!("Location updates reconfigured: {settings:?}");
            return;
        }

        self.relay.begin_start();
        let sink = EventSink::new(Arc::clone(&self.relay));
        match slot.capability.start(sink) {
            Ok(()) => {
                self.relay.commit_start();
                log::info!("Location updates started: {settings:?}");
            }
            Err(e) => {
                self.relay.abort_start();
                slot.settings = None;
                log::warn!("Location capability failed to start: {e}");
                self.relay.publish_failure(e.to_string());
            }
        }
    }

    /// Stops updates. Does nothing if already stopped.
    ///
    /// Once this returns, events still arriving from the capability are
    /// dropped and the cached position no longer changes.
    pub fn stop_location_updates(&self) {
        let mut slot = self.lock_slot();
        if !self.relay.stop() {
            log::debug!("Location updates already stopped");
            return;
        }
        slot.capability.stop();
        slot.settings = None;
        log::info!("Location updates stopped");
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FacadeState {
        if self.is_running() {
            FacadeState::Running
        } else {
            FacadeState::Stopped
        }
    }

    /// Returns true while updates are active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.relay.is_running()
    }

    /// Settings in effect, or `None` while stopped.
    #[must_use]
    pub fn active_settings(&self) -> Option<LocationSettings> {
        self.lock_slot().settings
    }

    /// The configuration this facade was built with.
    #[must_use]
    pub const fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// The last position delivered by the capability, or `None` if none has
    /// arrived yet.
    #[must_use]
    pub fn current_position(&self) -> Option<Position> {
        self.relay.current_position()
    }

    /// Great-circle distance between two positions in kilometers.
    #[must_use]
    pub fn distance_kilometers(a: &Position, b: &Position) -> f64 {
        distance_kilometers(a, b)
    }

    /// Distance in kilometers from the current position to `other`, or
    /// `None` if no position is known.
    #[must_use]
    pub fn distance_kilometers_from_current(&self, other: &Position) -> Option<f64> {
        self.current_position()
            .map(|current| distance_kilometers(&current, other))
    }

    /// Location permission as reported by the capability.
    #[must_use]
    pub fn authorization_status(&self) -> AuthorizationStatus {
        self.lock_slot().capability.authorization_status()
    }

    /// Runs `f` with exclusive access to the underlying capability, for
    /// platform-specific tuning the facade does not model.
    pub fn with_capability<R>(&self, f: impl FnOnce(&mut dyn LocationCapability) -> R) -> R {
        let mut slot = self.lock_slot();
        f(slot.capability.as_mut())
    }

    /// Subscribes to every event.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.relay.subscribe(), None)
    }

    /// Subscribes to a single topic.
    #[must_use]
    pub fn subscribe_to(&self, topic: Topic) -> Subscription {
        Subscription::new(self.relay.subscribe(), Some(topic))
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.relay.subscriber_count()
    }
}

impl Drop for LocationFacade {
    fn drop(&mut self) {
        if self.relay.stop() {
            self.lock_slot().capability.stop();
            log::debug!("Location updates stopped on drop");
        }
    }
}

impl std::fmt::Debug for LocationFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationFacade")
            .field("state", &self.state())
            .field("current_position", &self.current_position())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
