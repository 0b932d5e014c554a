use crate::angles::normalize_degrees;
use crate::houses::HouseCusps;
use crate::time::JulianDay;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Ephemeris backend unavailable: {message}")]
    ProviderUnavailable { message: String },
    #[error("Failed to calculate position for {body} at {julian_day}: {message}")]
    BodyFailed {
        body: Body,
        julian_day: JulianDay,
        message: String,
    },
    #[error("Invalid house system: {system}. Valid systems: {valid:?}")]
    InvalidHouseSystem { system: String, valid: Vec<String> },
    #[error("Unknown ephemeris provider: {name}. Valid providers: {valid:?}")]
    UnknownProvider { name: String, valid: Vec<String> },
    #[error("Unknown body: {name}")]
    UnknownBody { name: String },
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
}

/// Geographic location coordinates (degrees, east and north positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

impl GeoLocation {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// The ten canonical chart bodies, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
        }
    }

    /// Position in [`Body::ALL`]; the fixed ordering used for tie breaks.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Body {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Body::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == wanted)
            .ok_or_else(|| EphemerisError::UnknownBody {
                name: s.to_string(),
            })
    }
}

/// Whether the provider produced real data for a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyStatus {
    Computed,
    Unavailable,
}

/// Position of one body at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub body: Body,
    /// Ecliptic longitude in degrees [0, 360)
    pub longitude: f64,
    /// Ecliptic latitude in degrees
    pub latitude: f64,
    /// Geocentric distance in AU, `None` when the backend does not report it
    pub distance_au: Option<f64>,
    /// Daily motion in longitude (degrees/day); negative means retrograde
    pub speed: Option<f64>,
    pub status: BodyStatus,
}

impl BodyPosition {
    pub fn computed(body: Body, longitude: f64, latitude: f64) -> Self {
        Self {
            body,
            longitude: normalize_degrees(longitude),
            latitude,
            distance_au: None,
            speed: None,
            status: BodyStatus::Computed,
        }
    }

    /// Marker for a body the backend failed to compute. Its zero longitude
    /// must never be read as data.
    pub fn unavailable(body: Body) -> Self {
        Self {
            body,
            longitude: 0.0,
            latitude: 0.0,
            distance_au: None,
            speed: None,
            status: BodyStatus::Unavailable,
        }
    }

    pub fn with_distance(mut self, distance_au: f64) -> Self {
        self.distance_au = Some(distance_au);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn is_computed(&self) -> bool {
        self.status == BodyStatus::Computed
    }

    pub fn retrograde(&self) -> bool {
        self.speed.map_or(false, |s| s < 0.0)
    }
}

/// House system selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    Placidus,
    WholeSign,
}

const HOUSE_SYSTEMS: &[(&str, HouseSystem)] = &[
    ("placidus", HouseSystem::Placidus),
    ("whole_sign", HouseSystem::WholeSign),
];

impl HouseSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "placidus",
            HouseSystem::WholeSign => "whole_sign",
        }
    }
}

impl FromStr for HouseSystem {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        HOUSE_SYSTEMS
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, system)| *system)
            .ok_or_else(|| EphemerisError::InvalidHouseSystem {
                system: s.to_string(),
                valid: HOUSE_SYSTEMS.iter().map(|(name, _)| name.to_string()).collect(),
            })
    }
}

/// Everything a provider returns for one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisSnapshot {
    pub julian_day: JulianDay,
    /// One entry per canonical body, in [`Body::ALL`] order
    pub bodies: Vec<BodyPosition>,
    /// House positions (None if no observer was provided)
    pub houses: Option<HouseCusps>,
}

impl EphemerisSnapshot {
    pub fn body(&self, body: Body) -> Option<&BodyPosition> {
        self.bodies.iter().find(|p| p.body == body)
    }

    /// Longitude of a body, only if it was actually computed.
    pub fn longitude(&self, body: Body) -> Option<f64> {
        self.body(body).filter(|p| p.is_computed()).map(|p| p.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_system_parses_loosely() {
        assert_eq!("Placidus".parse::<HouseSystem>().unwrap(), HouseSystem::Placidus);
        assert_eq!("whole-sign".parse::<HouseSystem>().unwrap(), HouseSystem::WholeSign);
        assert!(matches!(
            "koch".parse::<HouseSystem>(),
            Err(EphemerisError::InvalidHouseSystem { .. })
        ));
    }

    #[test]
    fn test_body_order_is_canonical() {
        for (i, body) in Body::ALL.iter().enumerate() {
            assert_eq!(body.index(), i);
            assert_eq!(body.as_str().parse::<Body>().unwrap(), *body);
        }
    }

    #[test]
    fn test_unknown_body_is_a_typed_error() {
        assert_eq!(" Saturn".parse::<Body>().unwrap(), Body::Saturn);
        assert_eq!(
            "chiron".parse::<Body>(),
            Err(EphemerisError::UnknownBody {
                name: "chiron".to_string()
            })
        );
    }

    #[test]
    fn test_unavailable_body_is_flagged() {
        let pos = BodyPosition::unavailable(Body::Pluto);
        assert!(!pos.is_computed());
        assert!(!pos.retrograde());
        let snapshot = EphemerisSnapshot {
            julian_day: JulianDay(2_451_545.0),
            bodies: vec![pos],
            houses: None,
        };
        assert_eq!(snapshot.longitude(Body::Pluto), None);
    }
}
