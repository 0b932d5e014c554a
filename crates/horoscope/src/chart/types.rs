use crate::aspects::{Aspect, ChartPoint, PointPosition};
use crate::ephemeris::types::{Body, BodyPosition};
use crate::houses::HouseCusps;
use crate::time::{BirthMoment, JulianDay};
use crate::western::{ElementTally, QualityTally, SignPlacement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Non-fatal conditions met while assembling a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartWarning {
    /// Houses, ascendant and midheaven were left out.
    PartialHouseData { reason: String },
    /// The cusp table did not partition the circle; every body sits in house 1.
    DegenerateCusps,
    /// The provider could not compute these bodies.
    DegradedBodies { bodies: Vec<Body> },
}

/// One natal body with its derived placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBody {
    pub position: BodyPosition,
    /// `None` when the body is unavailable
    pub placement: Option<SignPlacement>,
    /// `None` when the chart has no houses or the body is unavailable
    pub house: Option<u8>,
    pub retrograde: bool,
}

impl ChartBody {
    pub fn body(&self) -> Body {
        self.position.body
    }

    pub fn is_computed(&self) -> bool {
        self.position.is_computed()
    }
}

/// A computed natal chart. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    pub moment: BirthMoment,
    pub julian_day: JulianDay,
    pub ut: DateTime<Utc>,
    /// Birth time was assumed or house data is missing
    pub approx: bool,
    /// At least one body could not be computed
    pub degraded: bool,
    /// Canonical body order
    pub bodies: Vec<ChartBody>,
    pub houses: Option<HouseCusps>,
    pub ascendant: Option<SignPlacement>,
    pub midheaven: Option<SignPlacement>,
    pub aspects: Vec<Aspect>,
    pub elements: ElementTally,
    pub qualities: QualityTally,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ChartWarning>,
}

impl NatalChart {
    pub fn body(&self, body: Body) -> Option<&ChartBody> {
        self.bodies.iter().find(|b| b.body() == body)
    }

    pub fn has_houses(&self) -> bool {
        self.houses.is_some()
    }

    /// Longitude of a computed body or an angle present in the chart.
    pub fn point_longitude(&self, point: ChartPoint) -> Option<f64> {
        match point {
            ChartPoint::Body(body) => self
                .body(body)
                .filter(|b| b.is_computed())
                .map(|b| b.position.longitude),
            ChartPoint::Ascendant => self.houses.as_ref().map(|h| h.ascendant),
            ChartPoint::Midheaven => self.houses.as_ref().map(|h| h.midheaven),
        }
    }

    /// Every point usable as an aspect or transit target, in fixed order.
    pub fn points(&self) -> Vec<PointPosition> {
        let mut points: Vec<PointPosition> = self
            .bodies
            .iter()
            .filter(|b| b.is_computed())
            .map(|b| PointPosition {
                point: ChartPoint::Body(b.body()),
                longitude: b.position.longitude,
                speed: b.position.speed,
            })
            .collect();
        if let Some(houses) = &self.houses {
            points.push(PointPosition {
                point: ChartPoint::Ascendant,
                longitude: houses.ascendant,
                speed: None,
            });
            points.push(PointPosition {
                point: ChartPoint::Midheaven,
                longitude: houses.midheaven,
                speed: None,
            });
        }
        points
    }

    pub fn has_warning(&self, predicate: impl Fn(&ChartWarning) -> bool) -> bool {
        self.warnings.iter().any(predicate)
    }
}
