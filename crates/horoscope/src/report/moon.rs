//! Lunar phase and sign for the report header.

use crate::angles::forward_arc;
use crate::ephemeris::types::{Body, EphemerisSnapshot};
use crate::western::{sign_ruler, Sign, SignPlacement};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

const PHASES: [MoonPhase; 8] = [
    MoonPhase::NewMoon,
    MoonPhase::WaxingCrescent,
    MoonPhase::FirstQuarter,
    MoonPhase::WaxingGibbous,
    MoonPhase::FullMoon,
    MoonPhase::WaningGibbous,
    MoonPhase::LastQuarter,
    MoonPhase::WaningCrescent,
];

impl MoonPhase {
    /// Phase for a Sun-to-Moon elongation; each phase spans 45° centred on
    /// its nominal angle.
    pub fn from_elongation(elongation: f64) -> Self {
        let shifted = forward_arc(-22.5, elongation);
        PHASES[((shifted / 45.0) as usize).min(7)]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "new_moon",
            MoonPhase::WaxingCrescent => "waxing_crescent",
            MoonPhase::FirstQuarter => "first_quarter",
            MoonPhase::WaxingGibbous => "waxing_gibbous",
            MoonPhase::FullMoon => "full_moon",
            MoonPhase::WaningGibbous => "waning_gibbous",
            MoonPhase::LastQuarter => "last_quarter",
            MoonPhase::WaningCrescent => "waning_crescent",
        }
    }
}

/// Illuminated fraction of the disc for an elongation, in [0, 1].
pub fn illumination(elongation: f64) -> f64 {
    (1.0 - elongation.to_radians().cos()) / 2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonSummary {
    pub sign: Sign,
    pub placement: SignPlacement,
    pub phase: MoonPhase,
    /// Moon minus Sun, [0, 360)
    pub elongation: f64,
    pub illumination: f64,
    /// Modern ruler of the Moon's sign
    pub ruler: Body,
}

impl MoonSummary {
    pub fn from_longitudes(sun: f64, moon: f64) -> Self {
        let elongation = forward_arc(sun, moon);
        let placement = SignPlacement::from_longitude(moon);
        Self {
            sign: placement.sign,
            placement,
            phase: MoonPhase::from_elongation(elongation),
            elongation,
            illumination: illumination(elongation),
            ruler: sign_ruler(placement.sign, true),
        }
    }

    /// `None` unless both the Sun and the Moon were computed.
    pub fn from_snapshot(snapshot: &EphemerisSnapshot) -> Option<Self> {
        let sun = snapshot.longitude(Body::Sun)?;
        let moon = snapshot.longitude(Body::Moon)?;
        Some(Self::from_longitudes(sun, moon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_by_elongation() {
        assert_eq!(MoonPhase::from_elongation(0.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_elongation(350.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_elongation(45.0), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::from_elongation(90.0), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_elongation(180.0), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_elongation(270.0), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_elongation(330.0), MoonPhase::WaningCrescent);
    }

    #[test]
    fn test_full_moon_is_fully_lit() {
        let s = MoonSummary::from_longitudes(10.0, 190.0);
        assert_eq!(s.phase, MoonPhase::FullMoon);
        assert!((s.illumination - 1.0).abs() < 1e-12);
        assert_eq!(s.sign, Sign::Libra);
        assert_eq!(s.ruler, Body::Venus);
        let new = MoonSummary::from_longitudes(100.0, 101.0);
        assert!(new.illumination < 0.001);
    }
}
