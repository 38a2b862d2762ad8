//! Location values and distance math.
//!
//! Everything in this module is plain data or pure functions; nothing here
//! talks to the location capability.
//!
//! - [`Position`]: a validated, timestamped coordinate
//! - [`LocationSettings`]: what to ask the capability for
//! - [`distance_kilometers`]: haversine great-circle distance
//!
//! # Example Usage
//!
//! ```
//! use location_facade::location::{distance_kilometers, Position};
//!
//! let a = Position::new(46.0569, 14.5058).unwrap();
//! let b = Position::new(46.0569, 14.5058).unwrap();
//! assert_eq!(distance_kilometers(&a, &b), 0.0);
//! ```

mod distance;
mod error;
mod types;

pub use distance::{distance_kilometers, distance_meters, haversine_kilometers, EARTH_RADIUS_KM};
pub use error::{LocationError, LocationResult};
pub use types::{
    AuthorizationStatus, LocationSettings, MonitorMode, Position, PositionBuilder,
    DEFAULT_DESIRED_ACCURACY_METERS, DEFAULT_DISTANCE_FILTER_METERS,
};
