//! Location data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{LocationError, LocationResult};

/// Acquisition strategy requested from the location capability.
///
/// The facade only passes the mode through; what each mode costs in power
/// and accuracy is decided by the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MonitorMode {
    /// Continuous high-accuracy updates, requesting "always" permission.
    #[default]
    Standard,
    /// Continuous high-accuracy updates, requesting permission only while
    /// the application is in use.
    StandardWhenInUse,
    /// Low-power updates delivered only when the device moves a significant
    /// distance (typically cell tower changes).
    SignificantChangesOnly,
}

/// Permission state for sharing location with the application, as reported
/// by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AuthorizationStatus {
    /// The user has not been asked yet.
    #[default]
    NotDetermined,
    /// The user refused access.
    Denied,
    /// Access is blocked by policy (parental controls, MDM, ...).
    Restricted,
    /// Access granted at all times, including in the background.
    AuthorizedAlways,
    /// Access granted only while the application is in use.
    AuthorizedWhenInUse,
}

impl AuthorizationStatus {
    /// Returns true if the platform will deliver positions in some form.
    #[must_use]
    pub const fn is_authorized(self) -> bool {
        matches!(self, Self::AuthorizedAlways | Self::AuthorizedWhenInUse)
    }
}

/// A timestamped geographic coordinate.
///
/// Positions are immutable once built. Construction validates ranges so a
/// `Position` always holds a usable coordinate:
///
/// - latitude finite and within `-90.0..=90.0`
/// - longitude finite and within `-180.0..=180.0`
/// - horizontal accuracy finite and non-negative (meters)
/// - altitude, when present, finite (meters)
///
/// # Example
///
/// ```
/// use location_facade::location::Position;
///
/// let paris = Position::new(48.8566, 2.3522).unwrap();
/// assert_eq!(paris.latitude(), 48.8566);
/// assert!(paris.altitude().is_none());
///
/// let summit = Position::builder(45.8326, 6.8652)
///     .altitude(4808.0)
///     .horizontal_accuracy(5.0)
///     .build()
///     .unwrap();
/// assert_eq!(summit.altitude(), Some(4808.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
    timestamp: DateTime<Utc>,
    horizontal_accuracy: f64,
}

impl Position {
    /// Creates a position at the given coordinate, timestamped now, with no
    /// altitude and zero horizontal accuracy.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidCoordinate`] if either coordinate is
    /// out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> LocationResult<Self> {
        Self::builder(latitude, longitude).build()
    }

    /// Starts building a position with optional fields.
    #[must_use]
    pub const fn builder(latitude: f64, longitude: f64) -> PositionBuilder {
        PositionBuilder {
            latitude,
            longitude,
            altitude: None,
            timestamp: None,
            horizontal_accuracy: 0.0,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Altitude in meters, if the capability reported one.
    #[must_use]
    pub const fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    /// When the fix was taken.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Radius of uncertainty in meters.
    #[must_use]
    pub const fn horizontal_accuracy(&self) -> f64 {
        self.horizontal_accuracy
    }

    /// Great-circle distance to `other` in kilometers.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        super::distance::distance_kilometers(self, other)
    }

    /// Parses a position from JSON, applying the same validation as
    /// [`Position::new`].
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field is out of range.
    pub fn from_json(json: &str) -> LocationResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts this position to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> LocationResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Builder for [`Position`].
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct PositionBuilder {
    latitude: f64,
    longitude: f64,
    altitude: Option<f64>,
    timestamp: Option<DateTime<Utc>>,
    horizontal_accuracy: f64,
}

impl PositionBuilder {
    /// Sets the altitude in meters.
    pub const fn altitude(mut self, meters: f64) -> Self {
        self.altitude = Some(meters);
        self
    }

    /// Sets the timestamp. Defaults to the time of [`build`](Self::build).
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the horizontal accuracy radius in meters.
    pub const fn horizontal_accuracy(mut self, meters: f64) -> Self {
        self.horizontal_accuracy = meters;
        self
    }

    /// Validates the fields and builds the position.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidCoordinate`] naming the first field
    /// that failed validation.
    pub fn build(self) -> LocationResult<Position> {
        check(
            "latitude",
            self.latitude,
            self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude),
        )?;
        check(
            "longitude",
            self.longitude,
            self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude),
        )?;
        check(
            "horizontal accuracy",
            self.horizontal_accuracy,
            self.horizontal_accuracy.is_finite() && self.horizontal_accuracy >= 0.0,
        )?;
        if let Some(altitude) = self.altitude {
            check("altitude", altitude, altitude.is_finite())?;
        }

        Ok(Position {
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            horizontal_accuracy: self.horizontal_accuracy,
        })
    }
}

fn check(field: &'static str, value: f64, valid: bool) -> LocationResult<()> {
    if valid {
        Ok(())
    } else {
        Err(LocationError::InvalidCoordinate { field, value })
    }
}

/// Wire shape of [`Position`] before validation.
#[derive(Deserialize)]
struct RawPosition {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    altitude: Option<f64>,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    horizontal_accuracy: f64,
}

impl TryFrom<RawPosition> for Position {
    type Error = LocationError;

    fn try_from(raw: RawPosition) -> LocationResult<Self> {
        let mut builder = Self::builder(raw.latitude, raw.longitude)
            .timestamp(raw.timestamp)
            .horizontal_accuracy(raw.horizontal_accuracy);
        if let Some(altitude) = raw.altitude {
            builder = builder.altitude(altitude);
        }
        builder.build()
    }
}

/// Default minimum horizontal movement, in meters, before a new position is
/// reported. Zero reports every movement.
pub const DEFAULT_DISTANCE_FILTER_METERS: f64 = 0.0;

/// Default requested accuracy in meters. Zero asks for the best accuracy the
/// capability can achieve.
pub const DEFAULT_DESIRED_ACCURACY_METERS: f64 = 0.0;

/// Settings passed to the location capability when updates start.
///
/// # Example
///
/// ```
/// use location_facade::location::{LocationSettings, MonitorMode};
///
/// let settings = LocationSettings::new(MonitorMode::StandardWhenInUse, 25.0, 10.0).unwrap();
/// assert_eq!(settings.distance_filter_meters, 25.0);
///
/// assert!(LocationSettings::new(MonitorMode::Standard, -1.0, 10.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSettings {
    /// Acquisition strategy.
    pub mode: MonitorMode,

    /// Minimum horizontal movement in meters before an update is generated.
    pub distance_filter_meters: f64,

    /// Requested accuracy in meters (0 = best available).
    pub desired_accuracy_meters: f64,
}

impl LocationSettings {
    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidSettings`] if the filter or accuracy
    /// is negative or not finite.
    pub fn new(
        mode: MonitorMode,
        distance_filter_meters: f64,
        desired_accuracy_meters: f64,
    ) -> LocationResult<Self> {
        let settings = Self {
            mode,
            distance_filter_meters,
            desired_accuracy_meters,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Default settings with a different monitor mode.
    #[must_use]
    pub fn with_mode(mode: MonitorMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Checks that the numeric fields are usable.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidSettings`] describing the bad field.
    pub fn validate(&self) -> LocationResult<()> {
        if !(self.distance_filter_meters.is_finite() && self.distance_filter_meters >= 0.0) {
            return Err(LocationError::InvalidSettings(format!(
                "distance filter must be a non-negative number of meters, got {}",
                self.distance_filter_meters
            )));
        }
        if !(self.desired_accuracy_meters.is_finite() && self.desired_accuracy_meters >= 0.0) {
            return Err(LocationError::InvalidSettings(format!(
                "desired accuracy must be a non-negative number of meters, got {}",
                self.desired_accuracy_meters
            )));
        }
        Ok(())
    }

    /// Parses and validates settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json(json: &str) -> LocationResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Converts these settings to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> LocationResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            mode: MonitorMode::default(),
            distance_filter_meters: DEFAULT_DISTANCE_FILTER_METERS,
            desired_accuracy_meters: DEFAULT_DESIRED_ACCURACY_METERS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn monitor_mode_default_is_standard() {
        assert_eq!(MonitorMode::default(), MonitorMode::Standard);
    }

    #[test]
    fn authorization_status_default_is_not_determined() {
        assert_eq!(
            AuthorizationStatus::default(),
            AuthorizationStatus::NotDetermined
        );
    }

    #[test]
    fn authorization_status_is_authorized() {
        assert!(AuthorizationStatus::AuthorizedAlways.is_authorized());
        assert!(AuthorizationStatus::AuthorizedWhenInUse.is_authorized());
        assert!(!AuthorizationStatus::NotDetermined.is_authorized());
        assert!(!AuthorizationStatus::Denied.is_authorized());
        assert!(!AuthorizationStatus::Restricted.is_authorized());
    }

    #[test]
    fn position_new_keeps_coordinates() {
        let position = Position::new(46.0569, 14.5058).unwrap();
        assert_eq!(position.latitude(), 46.0569);
        assert_eq!(position.longitude(), 14.5058);
        assert_eq!(position.altitude(), None);
        assert_eq!(position.horizontal_accuracy(), 0.0);
    }

    #[test]
    fn position_builder_sets_optional_fields() {
        let at = Utc.with_ymd_and_hms(2014, 5, 1, 12, 0, 0).unwrap();
        let position = Position::builder(46.0569, 14.5058)
            .altitude(295.0)
            .horizontal_accuracy(12.5)
            .timestamp(at)
            .build()
            .unwrap();

        assert_eq!(position.altitude(), Some(295.0));
        assert_eq!(position.horizontal_accuracy(), 12.5);
        assert_eq!(position.timestamp(), at);
    }

    #[test]
    fn position_rejects_out_of_range_latitude() {
        let err = Position::new(91.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            LocationError::InvalidCoordinate {
                field: "latitude",
                ..
            }
        ));
        assert!(Position::new(-90.5, 0.0).is_err());
    }

    #[test]
    fn position_rejects_out_of_range_longitude() {
        let err = Position::new(0.0, 180.5).unwrap_err();
        assert!(matches!(
            err,
            LocationError::InvalidCoordinate {
                field: "longitude",
                ..
            }
        ));
    }

    #[test]
    fn position_rejects_non_finite_values() {
        assert!(Position::new(f64::NAN, 0.0).is_err());
        assert!(Position::new(0.0, f64::INFINITY).is_err());
        assert!(Position::builder(0.0, 0.0)
            .altitude(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn position_rejects_negative_accuracy() {
        let err = Position::builder(0.0, 0.0)
            .horizontal_accuracy(-1.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            LocationError::InvalidCoordinate {
                field: "horizontal accuracy",
                ..
            }
        ));
    }

    #[test]
    fn position_accepts_valid_boundaries() {
        assert!(Position::new(90.0, 180.0).is_ok());
        assert!(Position::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn position_json_is_validated_on_parse() {
        let json = r#"{"latitude":95.0,"longitude":0.0,"altitude":null,
            "timestamp":"2014-05-01T12:00:00Z","horizontal_accuracy":0.0}"#;
        assert!(Position::from_json(json).is_err());
    }

    #[test]
    fn position_json_roundtrip() {
        let original = Position::builder(48.8566, 2.3522)
            .altitude(35.0)
            .horizontal_accuracy(8.0)
            .build()
            .unwrap();
        let json = original.to_json().unwrap();
        let parsed = Position::from_json(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn settings_default_values() {
        let settings = LocationSettings::default();
        assert_eq!(settings.mode, MonitorMode::Standard);
        assert_eq!(settings.distance_filter_meters, DEFAULT_DISTANCE_FILTER_METERS);
        assert_eq!(
            settings.desired_accuracy_meters,
            DEFAULT_DESIRED_ACCURACY_METERS
        );
    }

    #[test]
    fn settings_with_mode_keeps_defaults() {
        let settings = LocationSettings::with_mode(MonitorMode::SignificantChangesOnly);
        assert_eq!(settings.mode, MonitorMode::SignificantChangesOnly);
        assert_eq!(settings.distance_filter_meters, DEFAULT_DISTANCE_FILTER_METERS);
    }

    #[test]
    fn settings_reject_negative_filter() {
        let err = LocationSettings::new(MonitorMode::Standard, -5.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("distance filter"));
    }

    #[test]
    fn settings_reject_non_finite_accuracy() {
        let err = LocationSettings::new(MonitorMode::Standard, 0.0, f64::NAN).unwrap_err();
        assert!(err.to_string().contains("desired accuracy"));
    }

    #[test]
    fn settings_from_json_validates() {
        let json = r#"{"mode":"SignificantChangesOnly","distance_filter_meters":-3.0,"desired_accuracy_meters":100.0}"#;
        assert!(matches!(
            LocationSettings::from_json(json),
            Err(LocationError::InvalidSettings(_))
        ));
    }

    #[test]
    fn settings_from_json_reads_mode() {
        let json = r#"{"mode":"StandardWhenInUse","distance_filter_meters":50.0,"desired_accuracy_meters":10.0}"#;
        let settings = LocationSettings::from_json(json).unwrap();
        assert_eq!(settings.mode, MonitorMode::StandardWhenInUse);
        assert_eq!(settings.distance_filter_meters, 50.0);
    }
}
