//! Swiss Ephemeris backend (cargo feature `swisseph`).
//!
//! Higher precision than the analytic model and true Placidus cusps. Needs the
//! Swiss Ephemeris data files on disk.

use crate::angles::normalize_degrees;
use crate::ephemeris::types::{
    Body, BodyPosition, EphemerisError, EphemerisSnapshot, GeoLocation, HouseSystem,
};
use crate::ephemeris::EphemerisProvider;
use crate::houses::HouseCusps;
use crate::time::JulianDay;
use async_trait::async_trait;
use std::env;
use std::path::PathBuf;
use swisseph::swe::{calc_ut, houses_ex};
use swisseph::{AscMc, Cusp};

// Swiss Ephemeris body codes, indexed like `Body::ALL`
const BODY_CODES: [i32; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];

// FLG_SWIEPH | FLG_SPEED
const CALC_FLAGS: i32 = 2 | 256;

fn house_system_byte(system: HouseSystem) -> u8 {
    match system {
        HouseSystem::Placidus => b'P',
        HouseSystem::WholeSign => b'W',
    }
}

/// Swiss Ephemeris adapter implementation
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        Ok(Self {
            ephemeris_path: path,
        })
    }

    pub fn ephemeris_path(&self) -> &PathBuf {
        &self.ephemeris_path
    }

    /// Calculate position for a single body
    pub fn calc_body_position(&self, body: Body, jd: JulianDay) -> Result<BodyPosition, EphemerisError> {
        let code = BODY_CODES[body.index()];
        let result = calc_ut(jd.value(), code as u32, CALC_FLAGS as u32).map_err(|e| {
            EphemerisError::BodyFailed {
                body,
                julian_day: jd,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        Ok(BodyPosition::computed(body, out[0], out[1])
            .with_distance(out[2])
            .with_speed(out[3]))
    }

    /// Calculate house cusps and angles
    pub fn calc_houses(&self, jd: JulianDay, observer: GeoLocation, system: HouseSystem) -> HouseCusps {
        let (c, a) = houses_ex(
            jd.value(),
            CALC_FLAGS,
            observer.lat,
            observer.lon,
            house_system_byte(system) as i32,
        );
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        HouseCusps {
            system,
            ascendant: normalize_degrees(ascmc.ascendant),
            midheaven: normalize_degrees(ascmc.mc),
            cusps: [
                cusps.first,
                cusps.second,
                cusps.third,
                cusps.fourth,
                cusps.fifth,
                cusps.sixth,
                cusps.seventh,
                cusps.eighth,
                cusps.ninth,
                cusps.tenth,
                cusps.eleventh,
                cusps.twelfth,
            ]
            .map(normalize_degrees),
        }
    }
}

#[async_trait]
impl EphemerisProvider for SwissEphemerisAdapter {
    fn name(&self) -> &str {
        "swiss"
    }

    async fn compute(
        &self,
        jd: JulianDay,
        observer: Option<GeoLocation>,
        system: HouseSystem,
    ) -> Result<EphemerisSnapshot, EphemerisError> {
        let mut failures = 0;
        let bodies: Vec<BodyPosition> = Body::ALL
            .iter()
            .map(|&body| {
                self.calc_body_position(body, jd).unwrap_or_else(|e| {
                    log::warn!("{}", e);
                    failures += 1;
                    BodyPosition::unavailable(body)
                })
            })
            .collect();

        if failures == Body::ALL.len() {
            return Err(EphemerisError::ProviderUnavailable {
                message: format!("no body could be computed at {}", jd),
            });
        }

        Ok(EphemerisSnapshot {
            julian_day: jd,
            bodies,
            houses: observer.map(|loc| self.calc_houses(jd, loc, system)),
        })
    }
}
