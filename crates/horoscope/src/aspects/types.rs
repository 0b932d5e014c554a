use crate::ephemeris::types::Body;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Orb at or below which an aspect is "tight".
pub const TIGHT_ORB: f64 = 2.0;
/// Orb at or below which an aspect is "moderate"; anything wider is "wide".
pub const MODERATE_ORB: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
    Quincunx,
}

impl AspectKind {
    /// Detection priority: the first kind within orb wins.
    pub const PRIORITY: [AspectKind; 6] = [
        AspectKind::Conjunction,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Opposition,
        AspectKind::Quincunx,
    ];

    pub fn exact_angle(self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Opposition => 180.0,
            AspectKind::Quincunx => 150.0,
        }
    }

    pub fn default_orb(self) -> f64 {
        match self {
            AspectKind::Conjunction | AspectKind::Opposition => 8.0,
            AspectKind::Square | AspectKind::Trine => 6.0,
            AspectKind::Sextile => 4.0,
            AspectKind::Quincunx => 3.0,
        }
    }

    pub fn nature(self) -> AspectNature {
        match self {
            AspectKind::Sextile | AspectKind::Trine => AspectNature::Harmonious,
            AspectKind::Square | AspectKind::Opposition | AspectKind::Quincunx => {
                AspectNature::Challenging
            }
            AspectKind::Conjunction => AspectNature::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Opposition => "opposition",
            AspectKind::Quincunx => "quincunx",
        }
    }

    pub fn priority(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectKind {
    type Err = AspectSettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        AspectKind::PRIORITY
            .iter()
            .copied()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| AspectSettingsError::UnknownAspect {
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectNature {
    Harmonious,
    Challenging,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tightness {
    Tight,
    Moderate,
    Wide,
}

impl Tightness {
    pub fn from_orb(orb: f64) -> Self {
        if orb <= TIGHT_ORB {
            Tightness::Tight
        } else if orb <= MODERATE_ORB {
            Tightness::Moderate
        } else {
            Tightness::Wide
        }
    }
}

/// A body or angle that can take part in an aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPoint {
    Body(Body),
    Ascendant,
    Midheaven,
}

impl ChartPoint {
    /// Fixed ordering: bodies in canonical order, then ASC, then MC.
    pub fn order(self) -> usize {
        match self {
            ChartPoint::Body(body) => body.index(),
            ChartPoint::Ascendant => Body::ALL.len(),
            ChartPoint::Midheaven => Body::ALL.len() + 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartPoint::Body(body) => body.as_str(),
            ChartPoint::Ascendant => "ascendant",
            ChartPoint::Midheaven => "midheaven",
        }
    }
}

impl fmt::Display for ChartPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Longitude (and optional daily motion) of a chart point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPosition {
    pub point: ChartPoint,
    pub longitude: f64,
    pub speed: Option<f64>,
}

/// Outcome of testing one pair of longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectMatch {
    pub kind: AspectKind,
    /// Exact angle for this aspect (0, 60, 90, 120, 150, 180)
    pub exact_angle: f64,
    /// Measured separation in [0, 180]
    pub separation: f64,
    /// Absolute deviation from the exact angle
    pub orb: f64,
    pub tightness: Tightness,
}

/// An aspect between two points of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub first: ChartPoint,
    pub second: ChartPoint,
    pub kind: AspectKind,
    pub exact_angle: f64,
    pub orb: f64,
    pub tightness: Tightness,
    /// Whether the aspect is applying; `None` when either speed is unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applying: Option<bool>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AspectSettingsError {
    #[error("Unknown aspect: {name}")]
    UnknownAspect { name: String },
    #[error("Invalid orb for {name}: {orb}")]
    InvalidOrb { name: String, orb: f64 },
}

/// Orb table for aspect detection.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectSettings {
    /// Maximum orb per aspect type
    pub orbs: HashMap<AspectKind, f64>,
    /// Whether the 150° aspect is detected at all
    pub include_quincunx: bool,
}

impl Default for AspectSettings {
    fn default() -> Self {
        Self {
            orbs: AspectKind::PRIORITY
                .iter()
                .map(|k| (*k, k.default_orb()))
                .collect(),
            include_quincunx: false,
        }
    }
}

impl AspectSettings {
    /// Defaults overridden by a name → orb table (e.g. from a config file).
    pub fn from_orb_map(
        overrides: &HashMap<String, f64>,
        include_quincunx: bool,
    ) -> Result<Self, AspectSettingsError> {
        let mut settings = Self {
            include_quincunx,
            ..Self::default()
        };
        for (name, orb) in overrides {
            let kind: AspectKind = name.parse()?;
            if !orb.is_finite() || *orb < 0.0 {
                return Err(AspectSettingsError::InvalidOrb {
                    name: name.clone(),
                    orb: *orb,
                });
            }
            settings.orbs.insert(kind, *orb);
        }
        Ok(settings)
    }

    pub fn max_orb(&self, kind: AspectKind) -> f64 {
        self.orbs.get(&kind).copied().unwrap_or_else(|| kind.default_orb())
    }

    /// Aspect kinds that are tested, in priority order.
    pub fn active_kinds(&self) -> impl Iterator<Item = AspectKind> + '_ {
        AspectKind::PRIORITY
            .iter()
            .copied()
            .filter(move |k| *k != AspectKind::Quincunx || self.include_quincunx)
    }
}
