//! Weight tables for transit scoring.
//!
//! The numbers are editorial policy, not astronomy. They are kept as plain
//! tables so they can be tuned without touching the scorer.

use crate::aspects::{AspectKind, ChartPoint};
use crate::ephemeris::types::Body;
use serde::{Deserialize, Serialize};

/// Transiting-body weights in canonical body order. Slow movers weigh more.
pub const PLANET_WEIGHTS: [f64; 10] = [
    1.0, // Sun
    0.6, // Moon
    0.8, // Mercury
    0.8, // Venus
    0.9, // Mars
    1.2, // Jupiter
    1.3, // Saturn
    1.1, // Uranus
    1.0, // Neptune
    1.2, // Pluto
];

/// Aspect weights in detection priority order.
pub const ASPECT_WEIGHTS: [f64; 6] = [
    1.0,  // conjunction
    0.6,  // sextile
    0.85, // square
    0.8,  // trine
    0.9,  // opposition
    0.5,  // quincunx
];

/// Natal target weights: bodies in canonical order, then ASC, then MC.
pub const TARGET_WEIGHTS: [f64; 12] = [
    1.3, 1.2, 0.9, 0.9, 0.9, 0.8, 0.8, 0.6, 0.6, 0.6, // Sun..Pluto
    1.2, // Ascendant
    1.1, // Midheaven
];

/// House weights for houses 1..=12: angular, succedent, cadent.
pub const HOUSE_WEIGHTS: [f64; 12] = [
    1.2, 1.0, 0.85, 1.2, 1.0, 0.85, 1.2, 1.0, 0.85, 1.2, 1.0, 0.85,
];

/// Used when the natal chart has no houses.
pub const NO_HOUSE_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub planet_weights: [f64; 10],
    pub aspect_weights: [f64; 6],
    pub target_weights: [f64; 12],
    pub house_weights: [f64; 12],
    pub no_house_weight: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            planet_weights: PLANET_WEIGHTS,
            aspect_weights: ASPECT_WEIGHTS,
            target_weights: TARGET_WEIGHTS,
            house_weights: HOUSE_WEIGHTS,
            no_house_weight: NO_HOUSE_WEIGHT,
        }
    }
}

impl ScoringPolicy {
    pub fn planet_weight(&self, body: Body) -> f64 {
        self.planet_weights[body.index()]
    }

    pub fn aspect_weight(&self, kind: AspectKind) -> f64 {
        self.aspect_weights[kind.priority()]
    }

    pub fn target_weight(&self, target: ChartPoint) -> f64 {
        self.target_weights[target.order()]
    }

    pub fn house_weight(&self, house: Option<u8>) -> f64 {
        match house {
            Some(h @ 1..=12) => self.house_weights[(h - 1) as usize],
            _ => self.no_house_weight,
        }
    }
}
