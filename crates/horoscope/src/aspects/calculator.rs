use crate::angles::{angular_separation, normalize_degrees, signed_delta};
use crate::aspects::types::{Aspect, AspectMatch, AspectSettings, PointPosition, Tightness};

/// Aspect calculator
pub struct AspectCalculator;

impl AspectCalculator {
    /// Create a new aspect calculator
    pub fn new() -> Self {
        Self
    }

    /// First aspect kind (in priority order) whose orb contains the separation.
    ///
    /// Ties between overlapping orbs go to the higher-priority kind, not the
    /// closer one.
    pub fn detect(&self, lon1: f64, lon2: f64, settings: &AspectSettings) -> Option<AspectMatch> {
        let separation = angular_separation(lon1, lon2);
        settings.active_kinds().find_map(|kind| {
            let exact = kind.exact_angle();
            let orb = (separation - exact).abs();
            (orb <= settings.max_orb(kind)).then(|| AspectMatch {
                kind,
                exact_angle: exact,
                separation,
                orb,
                tightness: Tightness::from_orb(orb),
            })
        })
    }

    /// Aspects between every pair of the given points.
    pub fn natal_aspects(&self, points: &[PointPosition], settings: &AspectSettings) -> Vec<Aspect> {
        let mut aspects = Vec::new();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let (a, b) = (&points[i], &points[j]);
                if let Some(m) = self.detect(a.longitude, b.longitude, settings) {
                    let applying = match (a.speed, b.speed) {
                        (Some(s1), Some(s2)) => Some(self.is_aspect_applying(
                            a.longitude,
                            b.longitude,
                            s1,
                            s2,
                            m.exact_angle,
                        )),
                        _ => None,
                    };
                    aspects.push(Aspect {
                        first: a.point,
                        second: b.point,
                        kind: m.kind,
                        exact_angle: m.exact_angle,
                        orb: m.orb,
                        tightness: m.tightness,
                        applying,
                    });
                }
            }
        }
        aspects
    }

    /// Determine if an aspect is applying (approaching exact) or separating
    pub fn is_aspect_applying(
        &self,
        lon1: f64,
        lon2: f64,
        speed1: f64,
        speed2: f64,
        aspect_angle: f64,
    ) -> bool {
        let relative_speed = speed1 - speed2;
        let current_distance = (angular_separation(lon1, lon2) - aspect_angle).abs();

        // Equal speeds never close the gap
        if relative_speed.abs() < 1e-9 {
            return false;
        }

        // Project forward a small amount to see if we're getting closer to exact
        let time_step = 0.01;
        let future_diff = signed_delta(lon2, lon1) + relative_speed * time_step;
        let future_distance =
            (angular_separation(normalize_degrees(future_diff), 0.0) - aspect_angle).abs();

        future_distance < current_distance
    }
}

impl Default for AspectCalculator {
    fn default() -> Self {
        Self::new()
    }
}
