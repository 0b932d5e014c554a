use crate::aspects::{AspectCalculator, AspectKind, AspectSettings, ChartPoint, Tightness};
use crate::chart::{sanitize_snapshot, NatalChart};
use crate::ephemeris::types::{Body, EphemerisSnapshot};
use crate::transit::policy::ScoringPolicy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Natal point a transit can touch.
pub type ChartTarget = ChartPoint;

/// One transiting body in aspect to one natal target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitHit {
    pub transiting: Body,
    pub target: ChartTarget,
    pub aspect: AspectKind,
    pub exact_angle: f64,
    pub orb: f64,
    pub tightness: Tightness,
    /// House of the transiting body against the natal cusps
    pub house: Option<u8>,
    pub retrograde: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applying: Option<bool>,
    pub score: f64,
}

/// Ranking order: score descending, then orb, body, target and aspect.
pub fn compare_hits(a: &TransitHit, b: &TransitHit) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.orb.total_cmp(&b.orb))
        .then_with(|| a.transiting.cmp(&b.transiting))
        .then_with(|| a.target.order().cmp(&b.target.order()))
        .then_with(|| a.aspect.priority().cmp(&b.aspect.priority()))
}

/// Closeness credited to a hit sitting exactly on its orb limit.
pub const MIN_ORB_CLOSENESS: f64 = 0.05;

/// `1 - orb / max_orb`, kept within [`MIN_ORB_CLOSENESS`], 1]. The detector
/// admits `orb == max_orb`, so every detected hit scores above zero. A zero
/// max orb only admits exact hits.
pub fn orb_closeness(orb: f64, max_orb: f64) -> f64 {
    if max_orb <= 0.0 {
        return 1.0;
    }
    (1.0 - orb / max_orb).clamp(MIN_ORB_CLOSENESS, 1.0)
}

pub struct TransitScorer {
    calculator: AspectCalculator,
}

impl TransitScorer {
    pub fn new() -> Self {
        Self {
            calculator: AspectCalculator::new(),
        }
    }

    /// Ranked hits of the bodies in `now` against every natal target.
    ///
    /// Only longitudes of `now` are used; observer data and houses in the
    /// snapshot are ignored.
    pub fn score(
        &self,
        natal: &NatalChart,
        now: &EphemerisSnapshot,
        settings: &AspectSettings,
        policy: &ScoringPolicy,
    ) -> Vec<TransitHit> {
        let (now, _) = sanitize_snapshot(now.clone());
        let targets = natal.points();
        let mut hits = Vec::new();

        for transit in now.bodies.iter().filter(|p| p.is_computed()) {
            let house = natal
                .houses
                .as_ref()
                .map(|h| h.house_of(transit.longitude).house);

            for target in &targets {
                let Some(m) = self.calculator.detect(transit.longitude, target.longitude, settings)
                else {
                    continue;
                };
                let applying = transit.speed.map(|speed| {
                    self.calculator.is_aspect_applying(
                        transit.longitude,
                        target.longitude,
                        speed,
                        0.0,
                        m.exact_angle,
                    )
                });
                let score = policy.planet_weight(transit.body)
                    * policy.aspect_weight(m.kind)
                    * policy.target_weight(target.point)
                    * policy.house_weight(house)
                    * orb_closeness(m.orb, settings.max_orb(m.kind));

                hits.push(TransitHit {
                    transiting: transit.body,
                    target: target.point,
                    aspect: m.kind,
                    exact_angle: m.exact_angle,
                    orb: m.orb,
                    tightness: m.tightness,
                    house,
                    retrograde: transit.retrograde(),
                    applying,
                    score,
                });
            }
        }

        hits.sort_by(compare_hits);
        log::debug!("scored {} transit hits", hits.len());
        hits
    }
}

impl Default for TransitScorer {
    fn default() -> Self {
        Self::new()
    }
}
