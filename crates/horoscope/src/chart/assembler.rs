//! Composition of time, ephemeris, houses, signs and aspects into a natal chart.

use crate::angles::normalize_degrees;
use crate::aspects::{AspectCalculator, AspectSettings};
use crate::chart::types::{ChartBody, ChartWarning, NatalChart};
use crate::ephemeris::types::{Body, BodyPosition, EphemerisError, EphemerisSnapshot};
use crate::error::ChartError;
use crate::houses::HouseCusps;
use crate::time::{BirthMoment, NormalizedMoment};
use crate::western::{tally, SignPlacement};

/// Snapshot with every canonical body present, in canonical order, with
/// longitudes re-normalized. Returns the bodies that are unavailable.
///
/// Missing bodies and bodies with non-finite coordinates become
/// `Unavailable` markers. Houses with a non-finite ascendant or midheaven are
/// dropped.
pub fn sanitize_snapshot(snapshot: EphemerisSnapshot) -> (EphemerisSnapshot, Vec<Body>) {
    let EphemerisSnapshot {
        julian_day,
        bodies,
        houses,
    } = snapshot;

    let mut degraded = Vec::new();
    let bodies = Body::ALL
        .iter()
        .map(|&body| {
            let usable = bodies
                .iter()
                .find(|p| p.body == body && p.is_computed() && p.longitude.is_finite())
                .cloned();
            match usable {
                Some(mut position) => {
                    position.longitude = normalize_degrees(position.longitude);
                    if !position.latitude.is_finite() {
                        position.latitude = 0.0;
                    }
                    position.speed = position.speed.filter(|s| s.is_finite());
                    position.distance_au = position.distance_au.filter(|d| d.is_finite());
                    position
                }
                None => {
                    degraded.push(body);
                    BodyPosition::unavailable(body)
                }
            }
        })
        .collect();

    let houses = houses
        .filter(|h| h.ascendant.is_finite() && h.midheaven.is_finite())
        .map(|mut h| {
            h.ascendant = normalize_degrees(h.ascendant);
            h.midheaven = normalize_degrees(h.midheaven);
            for cusp in h.cusps.iter_mut().filter(|c| c.is_finite()) {
                *cusp = normalize_degrees(*cusp);
            }
            h
        });

    (
        EphemerisSnapshot {
            julian_day,
            bodies,
            houses,
        },
        degraded,
    )
}

/// Builds [`NatalChart`]s from provider output. Holds no state between calls.
pub struct ChartAssembler {
    calculator: AspectCalculator,
}

impl ChartAssembler {
    pub fn new() -> Self {
        Self {
            calculator: AspectCalculator::new(),
        }
    }

    pub fn assemble(
        &self,
        moment: &BirthMoment,
        normalized: &NormalizedMoment,
        snapshot: EphemerisSnapshot,
        settings: &AspectSettings,
    ) -> Result<NatalChart, ChartError> {
        let (snapshot, degraded) = sanitize_snapshot(snapshot);
        if degraded.len() == Body::ALL.len() {
            return Err(ChartError::ProviderUnavailable(
                EphemerisError::ProviderUnavailable {
                    message: format!("no body positions available at {}", normalized.julian_day),
                },
            ));
        }

        let mut warnings = Vec::new();
        if !degraded.is_empty() {
            log::warn!("chart degraded, bodies unavailable: {:?}", degraded);
            warnings.push(ChartWarning::DegradedBodies {
                bodies: degraded.clone(),
            });
        }

        let houses = self.usable_houses(normalized, snapshot.houses, &mut warnings);

        let bodies: Vec<ChartBody> = snapshot
            .bodies
            .into_iter()
            .map(|position| {
                let computed = position.is_computed();
                let placement = computed.then(|| SignPlacement::from_longitude(position.longitude));
                let house = houses
                    .as_ref()
                    .filter(|_| computed)
                    .map(|h| h.house_of(position.longitude).house);
                ChartBody {
                    retrograde: position.retrograde(),
                    position,
                    placement,
                    house,
                }
            })
            .collect();

        let significant = [Body::Sun, Body::Moon]
            .into_iter()
            .filter_map(|b| {
                bodies
                    .iter()
                    .find(|cb| cb.body() == b && cb.is_computed())
                    .map(|cb| cb.position.longitude)
            })
            .chain(
                houses
                    .as_ref()
                    .filter(|_| !normalized.approx)
                    .map(|h| h.ascendant),
            );
        let (elements, qualities) = tally(significant);

        let mut chart = NatalChart {
            moment: moment.clone(),
            julian_day: normalized.julian_day,
            ut: normalized.ut,
            approx: normalized.approx || houses.is_none(),
            degraded: !degraded.is_empty(),
            ascendant: houses.as_ref().map(|h| SignPlacement::from_longitude(h.ascendant)),
            midheaven: houses.as_ref().map(|h| SignPlacement::from_longitude(h.midheaven)),
            bodies,
            houses,
            aspects: Vec::new(),
            elements,
            qualities,
            warnings,
        };
        chart.aspects = self.calculator.natal_aspects(&chart.points(), settings);

        log::debug!(
            "assembled chart at {}: {} aspects, {} warnings",
            chart.julian_day,
            chart.aspects.len(),
            chart.warnings.len()
        );
        Ok(chart)
    }

    fn usable_houses(
        &self,
        normalized: &NormalizedMoment,
        houses: Option<HouseCusps>,
        warnings: &mut Vec<ChartWarning>,
    ) -> Option<HouseCusps> {
        let reason = match (&houses, normalized.approx) {
            (_, true) => Some("birth time unknown"),
            (None, false) => Some("provider returned no house data"),
            (Some(_), false) => None,
        };
        if let Some(reason) = reason {
            log::warn!("houses omitted: {}", reason);
            warnings.push(ChartWarning::PartialHouseData {
                reason: reason.to_string(),
            });
            return None;
        }

        let houses = houses?;
        if !houses.is_well_formed() {
            log::warn!("degenerate house cusps {:?}, assigning house 1", houses.cusps);
            warnings.push(ChartWarning::DegenerateCusps);
        }
        Some(houses)
    }
}

impl Default for ChartAssembler {
    fn default() -> Self {
        Self::new()
    }
}
