//! Location Facade
//!
//! A thin convenience layer over a device location service. It starts and
//! stops updates, remembers the last known position, rebroadcasts the
//! service's events to subscribers, and computes great-circle distances.
//!
//! The location service itself is reached through the
//! [`LocationCapability`](capability::LocationCapability) trait, so the
//! facade can run against a platform binding or a test double.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod capability;
pub mod facade;
pub mod location;

pub use facade::{FacadeState, LocationEvent, LocationFacade, Subscription, Topic};
