//! Facade configuration.

use serde::{Deserialize, Serialize};

use crate::location::{LocationError, LocationResult, LocationSettings};

/// Default number of events buffered per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Configuration for a [`LocationFacade`](super::LocationFacade).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacadeConfig {
    /// Events buffered per subscriber before the slowest one starts
    /// skipping. Must be non-zero.
    pub event_capacity: usize,

    /// Settings used by `start_location_updates()`.
    pub default_settings: LocationSettings,
}

impl FacadeConfig {
    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidSettings`] if the capacity is zero or
    /// the default settings are invalid.
    pub fn validate(&self) -> LocationResult<()> {
        if self.event_capacity == 0 {
            return Err(LocationError::InvalidSettings(
                "event capacity must be at least 1".to_string(),
            ));
        }
        self.default_settings.validate()
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json(json: &str) -> LocationResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            default_settings: LocationSettings::default(),
        }
    }
}
