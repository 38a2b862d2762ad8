//! Reusable test helpers for facade integration tests.
//!
//! Every facade here runs against [`SimulatedCapability`], which stands in
//! for the platform location service and lets a test emit events directly.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use location_facade::capability::SimulatedCapability;
use location_facade::location::Position;
use location_facade::{LocationEvent, LocationFacade, Subscription};

/// Creates a stopped facade plus a handle to its simulated capability.
pub fn simulated_facade() -> (SimulatedCapability, LocationFacade) {
    let capability = SimulatedCapability::new();
    let facade = LocationFacade::new(capability.clone());
    (capability, facade)
}

/// Timestamp shared by every fixture position.
pub fn fix_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2014, 5, 1, 12, 0, 0).unwrap()
}

pub fn fix(latitude: f64, longitude: f64) -> Position {
    Position::builder(latitude, longitude)
        .timestamp(fix_time())
        .build()
        .expect("valid coordinate")
}

pub fn paris() -> Position {
    fix(48.8566, 2.3522)
}

pub fn london() -> Position {
    fix(51.5074, -0.1278)
}

pub fn ljubljana() -> Position {
    fix(46.0569, 14.5058)
}

/// Drains every event already queued on a subscription.
pub fn drain(subscription: &mut Subscription) -> Vec<LocationEvent> {
    std::iter::from_fn(|| subscription.try_recv()).collect()
}
