//! Error types reported by location capabilities.

use thiserror::Error;

use crate::location::AuthorizationStatus;

/// Errors a [`LocationCapability`](super::LocationCapability) can return
/// from `configure` or `start`.
///
/// The facade never hands these to its callers. They are logged and
/// broadcast as `location.failed` events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The location service is disabled or missing on this device.
    #[error("Location service unavailable: {0}")]
    Unavailable(String),

    /// The platform refuses to provide location with the current permission.
    #[error("Location access not authorized ({0:?})")]
    Unauthorized(AuthorizationStatus),

    /// The requested settings cannot be applied.
    #[error("Invalid capability configuration: {0}")]
    Configuration(String),
}

/// Result type for capability operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;
