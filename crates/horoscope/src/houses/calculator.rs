//! Sidereal time, angles and house cusps.

use crate::angles::{forward_arc, normalize_degrees};
use crate::ephemeris::types::{GeoLocation, HouseSystem};
use crate::houses::assigner::{assign_house, HouseAssignment};
use crate::time::{JulianDay, J2000};
use serde::{Deserialize, Serialize};

/// Mean obliquity of the ecliptic used for the ascendant.
pub const OBLIQUITY_DEG: f64 = 23.4393;

/// Greenwich mean sidereal time in degrees [0, 360).
pub fn greenwich_sidereal_time_deg(jd: JulianDay) -> f64 {
    let t = jd.centuries_since_j2000();
    normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * (jd.value() - J2000) + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Local sidereal time in hours [0, 24) for an east-positive longitude.
pub fn local_sidereal_time_hours(jd: JulianDay, longitude: f64) -> f64 {
    (greenwich_sidereal_time_deg(jd) / 15.0 + longitude / 15.0).rem_euclid(24.0)
}

/// Ecliptic longitude rising on the eastern horizon.
pub fn ascendant(lst_hours: f64, latitude: f64, obliquity: f64) -> f64 {
    let ramc = (lst_hours * 15.0).to_radians();
    let eps = obliquity.to_radians();
    let phi = latitude.to_radians();
    let asc = f64::atan2(
        ramc.cos(),
        -(ramc.sin() * eps.cos() + phi.tan() * eps.sin()),
    );
    normalize_degrees(asc.to_degrees())
}

/// Midheaven taken directly from local sidereal time.
pub fn midheaven(lst_hours: f64) -> f64 {
    normalize_degrees(lst_hours * 15.0)
}

/// Ascendant, midheaven and the twelve cusps (house 1 at index 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseCusps {
    pub system: HouseSystem,
    pub ascendant: f64,
    pub midheaven: f64,
    pub cusps: [f64; 12],
}

impl HouseCusps {
    /// Angles and cusps for an instant and observer.
    pub fn compute(jd: JulianDay, observer: GeoLocation, system: HouseSystem) -> Self {
        let lst = local_sidereal_time_hours(jd, observer.lon);
        let asc = ascendant(lst, observer.lat, OBLIQUITY_DEG);
        let mc = midheaven(lst);
        Self::from_angles(asc, mc, system)
    }

    pub fn from_angles(ascendant: f64, midheaven: f64, system: HouseSystem) -> Self {
        match system {
            HouseSystem::WholeSign => Self::whole_sign(ascendant, midheaven),
            HouseSystem::Placidus => Self::placidus_approx(ascendant, midheaven),
        }
    }

    /// Each house is one full sign, starting with the ascendant's sign.
    pub fn whole_sign(ascendant: f64, midheaven: f64) -> Self {
        let asc = normalize_degrees(ascendant);
        let start = (asc / 30.0).floor() * 30.0;
        let mut cusps = [0.0; 12];
        for (i, cusp) in cusps.iter_mut().enumerate() {
            *cusp = normalize_degrees(start + i as f64 * 30.0);
        }
        Self {
            system: HouseSystem::WholeSign,
            ascendant: asc,
            midheaven: normalize_degrees(midheaven),
            cusps,
        }
    }

    /// Approximate Placidus: the angles anchor cusps 1, 4, 7 and 10 and each
    /// quadrant is split into equal thirds of ecliptic arc. Not the iterative
    /// semi-arc solution.
    ///
    /// The reported midheaven is always the one passed in. When it lies below
    /// the horizon, cusp 10 is anchored on the opposite meridian point instead
    /// so the quadrants stay cyclic.
    pub fn placidus_approx(ascendant: f64, midheaven: f64) -> Self {
        let asc = normalize_degrees(ascendant);
        let desc = normalize_degrees(asc + 180.0);
        let mc = normalize_degrees(midheaven);
        let (upper, lower) = if forward_arc(asc, normalize_degrees(mc + 180.0)) > 180.0 {
            (normalize_degrees(mc + 180.0), mc)
        } else {
            (mc, normalize_degrees(mc + 180.0))
        };

        let mut cusps = [0.0; 12];
        let anchors = [
            (0, asc, lower),
            (3, lower, desc),
            (6, desc, upper),
            (9, upper, asc),
        ];
        for (start_index, from, to) in anchors {
            let arc = forward_arc(from, to);
            cusps[start_index] = from;
            cusps[start_index + 1] = normalize_degrees(from + arc / 3.0);
            cusps[start_index + 2] = normalize_degrees(from + 2.0 * arc / 3.0);
        }

        Self {
            system: HouseSystem::Placidus,
            ascendant: asc,
            midheaven: mc,
            cusps,
        }
    }

    /// Width of each house, wrap-aware.
    pub fn arcs(&self) -> [f64; 12] {
        let mut arcs = [0.0; 12];
        for (i, arc) in arcs.iter_mut().enumerate() {
            *arc = forward_arc(self.cusps[i], self.cusps[(i + 1) % 12]);
        }
        arcs
    }

    pub fn is_well_formed(&self) -> bool {
        crate::houses::assigner::cusps_partition_circle(&self.cusps)
    }

    pub fn house_of(&self, longitude: f64) -> HouseAssignment {
        assign_house(longitude, &self.cusps)
    }
}
