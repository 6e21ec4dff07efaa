//! Stops and the values that describe them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SequencingError;

/// A point on the Earth's surface in signed degrees.
///
/// Always within range: construct through [`Coordinate::new`], and
/// deserialization runs the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = SequencingError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, SequencingError> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lon_ok = lon.is_finite() && (-180.0..=180.0).contains(&lon);
        if lat_ok && lon_ok {
            Ok(Self { lat, lon })
        } else {
            Err(SequencingError::InvalidCoordinate { lat, lon })
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Opaque stop identity, unique within a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(String);

impl StopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Links a pickup to the delivery of the same parcel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingKey(String);

impl PairingKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopRole {
    Pickup,
    Delivery,
    Generic,
}

/// Acceptable arrival interval. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    earliest: Option<DateTime<Utc>>,
    latest: Option<DateTime<Utc>>,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = SequencingError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        match (raw.earliest, raw.latest) {
            (Some(earliest), Some(latest)) => TimeWindow::between(earliest, latest),
            (earliest, latest) => Ok(Self { earliest, latest }),
        }
    }
}

impl TimeWindow {
    /// Closed window `[earliest, latest]`.
    pub fn between(
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    ) -> Result<Self, SequencingError> {
        if latest < earliest {
            return Err(SequencingError::invalid_input(format!(
                "time window ends ({latest}) before it starts ({earliest})"
            )));
        }
        Ok(Self {
            earliest: Some(earliest),
            latest: Some(latest),
        })
    }

    pub fn not_before(earliest: DateTime<Utc>) -> Self {
        Self {
            earliest: Some(earliest),
            latest: None,
        }
    }

    pub fn not_after(latest: DateTime<Utc>) -> Self {
        Self {
            earliest: None,
            latest: Some(latest),
        }
    }

    /// Whether `arrival` satisfies every bound that is set.
    pub fn admits(&self, arrival: DateTime<Utc>) -> bool {
        self.earliest.is_none_or(|earliest| arrival >= earliest)
            && self.latest.is_none_or(|latest| arrival <= latest)
    }
}

/// A single place to visit on a route.
///
/// Deserialization runs [`Stop::check`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StopParts")]
pub struct Stop {
    id: StopId,
    location: Coordinate,
    role: StopRole,
    pairing_key: Option<PairingKey>,
    time_window: Option<TimeWindow>,
    service_minutes: f64,
    address: Option<String>,
}

#[derive(Deserialize)]
struct StopParts {
    id: StopId,
    location: Coordinate,
    role: StopRole,
    pairing_key: Option<PairingKey>,
    time_window: Option<TimeWindow>,
    #[serde(default)]
    service_minutes: f64,
    address: Option<String>,
}

impl TryFrom<StopParts> for Stop {
    type Error = SequencingError;

    fn try_from(parts: StopParts) -> Result<Self, Self::Error> {
        let stop = Stop {
            id: parts.id,
            location: parts.location,
            role: parts.role,
            pairing_key: parts.pairing_key,
            time_window: parts.time_window,
            service_minutes: parts.service_minutes,
            address: parts.address,
        };
        stop.check()?;
        Ok(stop)
    }
}

impl Stop {
    fn with_role(
        id: impl Into<String>,
        location: Coordinate,
        role: StopRole,
        pairing_key: Option<PairingKey>,
    ) -> Self {
        Self {
            id: StopId::new(id),
            location,
            role,
            pairing_key,
            time_window: None,
            service_minutes: 0.0,
            address: None,
        }
    }

    pub fn pickup(id: impl Into<String>, location: Coordinate, key: impl Into<String>) -> Self {
        Self::with_role(id, location, StopRole::Pickup, Some(PairingKey::new(key)))
    }

    pub fn delivery(id: impl Into<String>, location: Coordinate, key: impl Into<String>) -> Self {
        Self::with_role(id, location, StopRole::Delivery, Some(PairingKey::new(key)))
    }

    pub fn generic(id: impl Into<String>, location: Coordinate) -> Self {
        Self::with_role(id, location, StopRole::Generic, None)
    }

    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = Some(window);
        self
    }

    /// Minutes spent at the stop. Checked by [`Stop::check`], which every
    /// route, estimate and schedule runs before use.
    pub fn with_service_minutes(mut self, minutes: f64) -> Self {
        self.service_minutes = minutes;
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn id(&self) -> &StopId {
        &self.id
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn role(&self) -> StopRole {
        self.role
    }

    pub fn pairing_key(&self) -> Option<&PairingKey> {
        self.pairing_key.as_ref()
    }

    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    pub fn service_minutes(&self) -> f64 {
        self.service_minutes
    }

    /// Display label only; never used in computation.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Rejects field values the builders cannot rule out by construction.
    pub fn check(&self) -> Result<(), SequencingError> {
        if !self.service_minutes.is_finite() || self.service_minutes < 0.0 {
            return Err(SequencingError::InvalidServiceDuration {
                stop: self.id.clone(),
                minutes: self.service_minutes,
            });
        }
        Ok(())
    }
}
