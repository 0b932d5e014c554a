#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use horoscope::ephemeris::{
    Body, BodyPosition, EphemerisError, EphemerisProvider, EphemerisSnapshot, GeoLocation,
    HouseSystem,
};
use horoscope::houses::HouseCusps;
use horoscope::time::{BirthMoment, BirthTime, JulianDay, ZoneSpec};
use std::time::Duration;

pub const MOSCOW: GeoLocation = GeoLocation {
    lat: 55.7558,
    lon: 37.6173,
};

pub fn moscow_moment(time: Option<BirthTime>) -> BirthMoment {
    BirthMoment {
        date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        time,
        zone: ZoneSpec::Offset { minutes: 180 },
        location: MOSCOW,
        house_system: HouseSystem::Placidus,
    }
}

/// Returns the same longitudes for every instant.
pub struct FixedProvider {
    pub longitudes: [f64; 10],
    pub speeds: [f64; 10],
    pub houses: Option<HouseCusps>,
    pub missing: Vec<Body>,
}

impl FixedProvider {
    pub fn new(longitudes: [f64; 10]) -> Self {
        Self {
            longitudes,
            speeds: [1.0; 10],
            houses: Some(HouseCusps::whole_sign(0.0, 270.0)),
            missing: Vec::new(),
        }
    }

    pub fn without_houses(mut self) -> Self {
        self.houses = None;
        self
    }

    pub fn with_missing(mut self, body: Body) -> Self {
        self.missing.push(body);
        self
    }
}

#[async_trait]
impl EphemerisProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn compute(
        &self,
        jd: JulianDay,
        observer: Option<GeoLocation>,
        _system: HouseSystem,
    ) -> Result<EphemerisSnapshot, EphemerisError> {
        let bodies = Body::ALL
            .iter()
            .map(|&b| {
                if self.missing.contains(&b) {
                    BodyPosition::unavailable(b)
                } else {
                    BodyPosition::computed(b, self.longitudes[b.index()], 0.0)
                        .with_speed(self.speeds[b.index()])
                }
            })
            .collect();
        Ok(EphemerisSnapshot {
            julian_day: jd,
            bodies,
            houses: observer.and(self.houses.clone()),
        })
    }
}

/// Always fails.
pub struct FailingProvider;

#[async_trait]
impl EphemerisProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn compute(
        &self,
        _jd: JulianDay,
        _observer: Option<GeoLocation>,
        _system: HouseSystem,
    ) -> Result<EphemerisSnapshot, EphemerisError> {
        Err(EphemerisError::ProviderUnavailable {
            message: "backend offline".to_string(),
        })
    }
}

/// Sleeps longer than any sensible timeout.
pub struct SlowProvider(pub Duration);

#[async_trait]
impl EphemerisProvider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn compute(
        &self,
        jd: JulianDay,
        _observer: Option<GeoLocation>,
        _system: HouseSystem,
    ) -> Result<EphemerisSnapshot, EphemerisError> {
        tokio::time::sleep(self.0).await;
        Ok(EphemerisSnapshot {
            julian_day: jd,
            bodies: Vec::new(),
            houses: None,
        })
    }
}
