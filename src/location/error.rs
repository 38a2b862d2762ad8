//! Error types for location values and settings.
//!
//! These errors are only produced when constructing or parsing values.
//! Delivery failures from the location capability are never returned as
//! errors; they are broadcast to subscribers instead.

use thiserror::Error;

/// Errors that can occur when building location values.
#[derive(Debug, Error)]
pub enum LocationError {
    /// A coordinate or measurement was out of range or not finite.
    #[error("Invalid {field}: {value}")]
    InvalidCoordinate {
        /// Which field was rejected (e.g. "latitude").
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Settings or configuration failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for location value operations.
pub type LocationResult<T> = Result<T, LocationError>;
