//! Pure-Rust reference ephemeris.
//!
//! Mean orbital elements with secular rates (day 0 = 1999-12-31 0h UT), a
//! Newton solution of Kepler's equation, the principal periodic terms for the
//! Moon, Jupiter, Saturn and Uranus, and a periodic series for Pluto. Good to
//! roughly an arc-minute for the Sun and a few arc-minutes for the rest, which
//! is what a daily chart needs. Longitudes are tropical, of date.

use crate::angles::{normalize_degrees, signed_delta};
use crate::ephemeris::types::{
    Body, BodyPosition, EphemerisError, EphemerisSnapshot, GeoLocation, HouseSystem,
};
use crate::ephemeris::EphemerisProvider;
use crate::houses::HouseCusps;
use crate::time::JulianDay;
use async_trait::async_trait;

/// Julian Day of the element epoch (1999-12-31 0h UT).
const ELEMENT_EPOCH: f64 = 2_451_543.5;
const EARTH_RADII_PER_AU: f64 = 149_597_870.7 / 6378.14;
/// Half-width of the centred difference used for daily motion.
const SPEED_STEP_DAYS: f64 = 0.5;

/// Keplerian elements; angles in degrees, `a` in AU (Earth radii for the Moon).
#[derive(Debug, Clone, Copy)]
struct Elements {
    node: f64,
    incl: f64,
    peri: f64,
    a: f64,
    e: f64,
    mean_anomaly: f64,
}

fn elements(body: Body, d: f64) -> Elements {
    match body {
        Body::Sun => Elements {
            node: 0.0,
            incl: 0.0,
            peri: 282.9404 + 4.70935e-5 * d,
            a: 1.0,
            e: 0.016709 - 1.151e-9 * d,
            mean_anomaly: 356.0470 + 0.985_600_258_5 * d,
        },
        Body::Moon => Elements {
            node: 125.1228 - 0.052_953_808_3 * d,
            incl: 5.1454,
            peri: 318.0634 + 0.164_357_322_3 * d,
            a: 60.2666,
            e: 0.054900,
            mean_anomaly: 115.3654 + 13.064_992_950_9 * d,
        },
        Body::Mercury => Elements {
            node: 48.3313 + 3.24587e-5 * d,
            incl: 7.0047 + 5.00e-8 * d,
            peri: 29.1241 + 1.01444e-5 * d,
            a: 0.387098,
            e: 0.205635 + 5.59e-10 * d,
            mean_anomaly: 168.6562 + 4.092_334_436_8 * d,
        },
        Body::Venus => Elements {
            node: 76.6799 + 2.46590e-5 * d,
            incl: 3.3946 + 2.75e-8 * d,
            peri: 54.8910 + 1.38374e-5 * d,
            a: 0.723330,
            e: 0.006773 - 1.302e-9 * d,
            mean_anomaly: 48.0052 + 1.602_130_224_4 * d,
        },
        Body::Mars => Elements {
            node: 49.5574 + 2.11081e-5 * d,
            incl: 1.8497 - 1.78e-8 * d,
            peri: 286.5016 + 2.92961e-5 * d,
            a: 1.523688,
            e: 0.093405 + 2.516e-9 * d,
            mean_anomaly: 18.6021 + 0.524_020_776_6 * d,
        },
        Body::Jupiter => Elements {
            node: 100.4542 + 2.76854e-5 * d,
            incl: 1.3030 - 1.557e-7 * d,
            peri: 273.8777 + 1.64505e-5 * d,
            a: 5.20256,
            e: 0.048498 + 4.469e-9 * d,
            mean_anomaly: 19.8950 + 0.083_085_300_1 * d,
        },
        Body::Saturn => Elements {
            node: 113.6634 + 2.38980e-5 * d,
            incl: 2.4886 - 1.081e-7 * d,
            peri: 339.3939 + 2.97661e-5 * d,
            a: 9.55475,
            e: 0.055546 - 9.499e-9 * d,
            mean_anomaly: 316.9670 + 0.033_444_228_2 * d,
        },
        Body::Uranus => Elements {
            node: 74.0005 + 1.3978e-5 * d,
            incl: 0.7733 + 1.9e-8 * d,
            peri: 96.6612 + 3.0565e-5 * d,
            a: 19.18171 - 1.55e-8 * d,
            e: 0.047318 + 7.45e-9 * d,
            mean_anomaly: 142.5905 + 0.011_725_806 * d,
        },
        Body::Neptune => Elements {
            node: 131.7806 + 3.0173e-5 * d,
            incl: 1.7700 - 2.55e-7 * d,
            peri: 272.8461 - 6.027e-6 * d,
            a: 30.05826 + 3.313e-8 * d,
            e: 0.008606 + 2.15e-9 * d,
            mean_anomaly: 260.2471 + 0.005_995_147 * d,
        },
        // Pluto has no usable mean elements; see `pluto_heliocentric`.
        Body::Pluto => Elements {
            node: 0.0,
            incl: 0.0,
            peri: 0.0,
            a: 39.48,
            e: 0.0,
            mean_anomaly: 0.0,
        },
    }
}

fn sin_d(deg: f64) -> f64 {
    deg.to_radians().sin()
}

fn cos_d(deg: f64) -> f64 {
    deg.to_radians().cos()
}

/// Eccentric anomaly in radians.
fn solve_kepler(mean_anomaly_deg: f64, e: f64) -> f64 {
    let m = normalize_degrees(mean_anomaly_deg).to_radians();
    let mut ecc = m + e * m.sin() * (1.0 + e * m.cos());
    for _ in 0..16 {
        let delta = (ecc - e * ecc.sin() - m) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

/// Rectangular ecliptic coordinates in the orbit's central frame.
fn orbit_rectangular(el: &Elements) -> [f64; 3] {
    let ecc = solve_kepler(el.mean_anomaly, el.e);
    let xv = el.a * (ecc.cos() - el.e);
    let yv = el.a * (1.0 - el.e * el.e).sqrt() * ecc.sin();
    let v = yv.atan2(xv).to_degrees();
    let r = xv.hypot(yv);

    let arg = v + el.peri;
    let (sn, cn) = (sin_d(el.node), cos_d(el.node));
    let (sa, ca) = (sin_d(arg), cos_d(arg));
    let (si, ci) = (sin_d(el.incl), cos_d(el.incl));
    [
        r * (cn * ca - sn * sa * ci),
        r * (sn * ca + cn * sa * ci),
        r * sa * si,
    ]
}

/// (longitude, latitude, radius) from rectangular coordinates.
fn spherical(xyz: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = xyz;
    let lon = normalize_degrees(y.atan2(x).to_degrees());
    let lat = z.atan2(x.hypot(y)).to_degrees();
    let r = (x * x + y * y + z * z).sqrt();
    (lon, lat, r)
}

fn rectangular(lon: f64, lat: f64, r: f64) -> [f64; 3] {
    [
        r * cos_d(lon) * cos_d(lat),
        r * sin_d(lon) * cos_d(lat),
        r * sin_d(lat),
    ]
}

fn moon_geocentric(d: f64) -> (f64, f64, f64) {
    let moon = elements(Body::Moon, d);
    let sun = elements(Body::Sun, d);
    let (lon, lat, r) = spherical(orbit_rectangular(&moon));

    let ms = sun.mean_anomaly;
    let mm = moon.mean_anomaly;
    let ls = sun.mean_anomaly + sun.peri;
    let lm = moon.mean_anomaly + moon.peri + moon.node;
    let dd = lm - ls;
    let f = lm - moon.node;

    let lon = lon - 1.274 * sin_d(mm - 2.0 * dd) + 0.658 * sin_d(2.0 * dd)
        - 0.186 * sin_d(ms)
        - 0.059 * sin_d(2.0 * mm - 2.0 * dd)
        - 0.057 * sin_d(mm - 2.0 * dd + ms)
        + 0.053 * sin_d(mm + 2.0 * dd)
        + 0.046 * sin_d(2.0 * dd - ms)
        + 0.041 * sin_d(mm - ms)
        - 0.035 * sin_d(dd)
        - 0.031 * sin_d(mm + ms)
        - 0.015 * sin_d(2.0 * f - 2.0 * dd)
        + 0.011 * sin_d(mm - 4.0 * dd);
    let lat = lat - 0.173 * sin_d(f - 2.0 * dd) - 0.055 * sin_d(mm - f - 2.0 * dd)
        - 0.046 * sin_d(mm + f - 2.0 * dd)
        + 0.033 * sin_d(f + 2.0 * dd)
        + 0.017 * sin_d(2.0 * mm + f);
    let r = r - 0.58 * cos_d(mm - 2.0 * dd) - 0.46 * cos_d(2.0 * dd);

    (normalize_degrees(lon), lat, r / EARTH_RADII_PER_AU)
}

/// Heliocentric Pluto, precessed from J2000 to the equinox of date.
fn pluto_heliocentric(d: f64) -> (f64, f64, f64) {
    let s = 50.03 + 0.033_459_652 * d;
    let p = 238.95 + 0.003_968_789 * d;

    let lon = 238.9508 + 0.004_007_03 * d - 19.799 * sin_d(p) + 19.848 * cos_d(p)
        + 0.897 * sin_d(2.0 * p)
        - 4.956 * cos_d(2.0 * p)
        + 0.610 * sin_d(3.0 * p)
        + 1.211 * cos_d(3.0 * p)
        - 0.341 * sin_d(4.0 * p)
        - 0.190 * cos_d(4.0 * p)
        + 0.128 * sin_d(5.0 * p)
        - 0.034 * cos_d(5.0 * p)
        - 0.038 * sin_d(6.0 * p)
        + 0.031 * cos_d(6.0 * p)
        + 0.020 * sin_d(s - p)
        - 0.010 * cos_d(s - p);
    let lat = -3.9082 - 5.453 * sin_d(p) - 14.975 * cos_d(p) + 3.527 * sin_d(2.0 * p)
        + 1.673 * cos_d(2.0 * p)
        - 1.051 * sin_d(3.0 * p)
        + 0.328 * cos_d(3.0 * p)
        + 0.179 * sin_d(4.0 * p)
        - 0.292 * cos_d(4.0 * p)
        + 0.019 * sin_d(5.0 * p)
        + 0.100 * cos_d(5.0 * p)
        - 0.031 * sin_d(6.0 * p)
        - 0.026 * cos_d(6.0 * p)
        + 0.011 * cos_d(s - p);
    let r = 40.72 + 6.68 * sin_d(p) + 6.90 * cos_d(p) - 1.18 * sin_d(2.0 * p)
        - 0.03 * cos_d(2.0 * p)
        + 0.15 * sin_d(3.0 * p)
        - 0.14 * cos_d(3.0 * p);

    (normalize_degrees(lon + 3.82394e-5 * d), lat, r)
}

/// Heliocentric (lon, lat, r) of a planet including the gas-giant terms.
fn planet_heliocentric(body: Body, d: f64) -> (f64, f64, f64) {
    if body == Body::Pluto {
        return pluto_heliocentric(d);
    }
    let (lon, lat, r) = spherical(orbit_rectangular(&elements(body, d)));
    let mj = elements(Body::Jupiter, d).mean_anomaly;
    let ms = elements(Body::Saturn, d).mean_anomaly;
    let mu = elements(Body::Uranus, d).mean_anomaly;

    let (dlon, dlat) = match body {
        Body::Jupiter => (
            -0.332 * sin_d(2.0 * mj - 5.0 * ms - 67.6) - 0.056 * sin_d(2.0 * mj - 2.0 * ms + 21.0)
                + 0.042 * sin_d(3.0 * mj - 5.0 * ms + 21.0)
                - 0.036 * sin_d(mj - 2.0 * ms)
                + 0.022 * cos_d(mj - ms)
                + 0.023 * sin_d(2.0 * mj - 3.0 * ms + 52.0)
                - 0.016 * sin_d(mj - 5.0 * ms - 69.0),
            0.0,
        ),
        Body::Saturn => (
            0.812 * sin_d(2.0 * mj - 5.0 * ms - 67.6) - 0.229 * cos_d(2.0 * mj - 4.0 * ms - 2.0)
                + 0.119 * sin_d(mj - 2.0 * ms - 3.0)
                + 0.046 * sin_d(2.0 * mj - 6.0 * ms - 69.0)
                + 0.014 * sin_d(mj - 3.0 * ms + 32.0),
            -0.020 * cos_d(2.0 * mj - 4.0 * ms - 2.0) + 0.018 * sin_d(2.0 * mj - 6.0 * ms - 49.0),
        ),
        Body::Uranus => (
            0.040 * sin_d(ms - 2.0 * mu + 6.0) + 0.035 * sin_d(ms - 3.0 * mu + 33.0)
                - 0.015 * sin_d(mj - mu + 20.0),
            0.0,
        ),
        _ => (0.0, 0.0),
    };
    (normalize_degrees(lon + dlon), lat + dlat, r)
}

/// Geocentric (longitude, latitude, distance AU) for a body at day number `d`.
fn geocentric(body: Body, d: f64) -> (f64, f64, f64) {
    let sun = orbit_rectangular(&elements(Body::Sun, d));
    match body {
        Body::Sun => spherical(sun),
        Body::Moon => moon_geocentric(d),
        _ => {
            let (lon, lat, r) = planet_heliocentric(body, d);
            let helio = rectangular(lon, lat, r);
            spherical([helio[0] + sun[0], helio[1] + sun[1], helio[2] + sun[2]])
        }
    }
}

/// Geocentric position plus centred-difference daily motion.
pub fn body_position(body: Body, jd: JulianDay) -> Result<BodyPosition, EphemerisError> {
    let d = jd.value() - ELEMENT_EPOCH;
    let (lon, lat, dist) = geocentric(body, d);
    let (before, _, _) = geocentric(body, d - SPEED_STEP_DAYS);
    let (after, _, _) = geocentric(body, d + SPEED_STEP_DAYS);
    let speed = signed_delta(before, after) / (2.0 * SPEED_STEP_DAYS);

    if !(lon.is_finite() && lat.is_finite() && dist.is_finite() && speed.is_finite()) {
        return Err(EphemerisError::BodyFailed {
            body,
            julian_day: jd,
            message: "non-finite result from orbital model".to_string(),
        });
    }

    Ok(BodyPosition::computed(body, lon, lat)
        .with_distance(dist)
        .with_speed(speed))
}

/// The built-in provider. Stateless and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core of [`EphemerisProvider::compute`].
    pub fn compute_sync(
        &self,
        jd: JulianDay,
        observer: Option<GeoLocation>,
        system: HouseSystem,
    ) -> Result<EphemerisSnapshot, EphemerisError> {
        if !jd.value().is_finite() {
            return Err(EphemerisError::ProviderUnavailable {
                message: format!("non-finite Julian Day {}", jd.value()),
            });
        }

        let bodies = Body::ALL
            .iter()
            .map(|&body| {
                body_position(body, jd).unwrap_or_else(|e| {
                    log::warn!("{}", e);
                    BodyPosition::unavailable(body)
                })
            })
            .collect();

        let houses = observer.map(|loc| HouseCusps::compute(jd, loc, system));

        Ok(EphemerisSnapshot {
            julian_day: jd,
            bodies,
            houses,
        })
    }
}

#[async_trait]
impl EphemerisProvider for AnalyticEphemeris {
    fn name(&self) -> &str {
        "analytic"
    }

    async fn compute(
        &self,
        jd: JulianDay,
        observer: Option<GeoLocation>,
        system: HouseSystem,
    ) -> Result<EphemerisSnapshot, EphemerisError> {
        self.compute_sync(jd, observer, system)
    }
}
