//! Optional process-wide facade instance.
//!
//! Prefer constructing a [`LocationFacade`] and passing it where it is
//! needed. For applications that want one instance reachable from anywhere,
//! the shared instance is created on first use and lives until the process
//! exits. It is never dropped, so its capability is never stopped
//! implicitly.

use std::sync::OnceLock;

use super::manager::LocationFacade;
use crate::capability::LocationCapability;

static SHARED: OnceLock<LocationFacade> = OnceLock::new();

impl LocationFacade {
    /// Returns the process-wide facade, creating it around the capability
    /// returned by `init` on the first call. Later calls ignore `init`.
    pub fn shared_or_init<C, F>(init: F) -> &'static Self
    where
        C: LocationCapability + 'static,
        F: FnOnce() -> C,
    {
        SHARED.get_or_init(|| {
            log::debug!("Creating shared location facade");
            Self::new(init())
        })
    }

    /// Returns the process-wide facade if it has been created.
    #[must_use]
    pub fn shared() -> Option<&'static Self> {
        SHARED.get()
    }
}
