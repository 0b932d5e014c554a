//! House membership for a longitude.

use crate::angles::{forward_arc, in_arc, normalize_degrees};
use serde::{Deserialize, Serialize};

/// Result of placing a longitude in a house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseAssignment {
    /// House number 1..=12
    pub house: u8,
    /// True when the cusp table was degenerate and house 1 was assigned
    pub fallback: bool,
}

/// Twelve finite cusps whose forward arcs add up to one full turn.
pub fn cusps_partition_circle(cusps: &[f64]) -> bool {
    if cusps.len() != 12 || cusps.iter().any(|c| !c.is_finite()) {
        return false;
    }
    let total: f64 = (0..12)
        .map(|i| forward_arc(cusps[i], cusps[(i + 1) % 12]))
        .sum();
    (total - 360.0).abs() < 1e-6
}

/// House `i` such that `longitude` lies in `[cusp[i], cusp[i+1])`, wrapping at 360°.
///
/// Degenerate cusp tables (wrong length, non-finite values, or cusps that do
/// not run once around the circle) put every longitude in house 1.
pub fn assign_house(longitude: f64, cusps: &[f64]) -> HouseAssignment {
    if !cusps_partition_circle(cusps) {
        return HouseAssignment {
            house: 1,
            fallback: true,
        };
    }

    let lon = normalize_degrees(longitude);
    let found = (0..12).find(|&i| in_arc(lon, cusps[i], cusps[(i + 1) % 12]));
    // Only reachable through rounding at a boundary: take the cusp just behind.
    let index = found.unwrap_or_else(|| {
        (0..12)
            .min_by(|&a, &b| {
                forward_arc(cusps[a], lon).total_cmp(&forward_arc(cusps[b], lon))
            })
            .unwrap_or(0)
    });

    HouseAssignment {
        house: index as u8 + 1,
        fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equal_cusps(start: f64) -> Vec<f64> {
        (0..12).map(|i| normalize_degrees(start + i as f64 * 30.0)).collect()
    }

    #[test]
    fn test_assigns_simple_houses() {
        let cusps = equal_cusps(0.0);
        assert_eq!(assign_house(0.0, &cusps).house, 1);
        assert_eq!(assign_house(29.999, &cusps).house, 1);
        assert_eq!(assign_house(30.0, &cusps).house, 2);
        assert_eq!(assign_house(359.9, &cusps).house, 12);
    }

    #[test]
    fn test_wraps_through_aries_point() {
        let cusps = equal_cusps(345.0);
        assert_eq!(assign_house(350.0, &cusps).house, 1);
        assert_eq!(assign_house(5.0, &cusps).house, 1);
        assert_eq!(assign_house(15.0, &cusps).house, 2);
        assert_eq!(assign_house(344.0, &cusps).house, 12);
        assert!(!assign_house(344.0, &cusps).fallback);
    }

    #[test]
    fn test_degenerate_cusps_fall_back_to_first_house() {
        let flat = vec![42.0; 12];
        let short = vec![0.0, 30.0, 60.0];
        let nan = {
            let mut c = equal_cusps(0.0);
            c[4] = f64::NAN;
            c
        };
        for cusps in [flat, short, nan, Vec::new()] {
            let a = assign_house(123.0, &cusps);
            assert_eq!(a, HouseAssignment { house: 1, fallback: true });
        }
    }

    #[test]
    fn test_out_of_order_cusps_are_degenerate() {
        let mut cusps = equal_cusps(0.0);
        cusps.swap(2, 5);
        assert!(!cusps_partition_circle(&cusps));
        assert!(assign_house(75.0, &cusps).fallback);
    }

    #[test]
    fn test_sweep_covers_every_longitude_once() {
        let cusps = vec![
            347.2, 12.8, 41.0, 73.5, 104.9, 133.3, 167.2, 192.8, 221.0, 253.5, 284.9, 313.3,
        ];
        assert!(cusps_partition_circle(&cusps));
        let mut counts = [0usize; 12];
        for step in 0..3600 {
            let lon = step as f64 * 0.1;
            let containing = (0..12)
                .filter(|&i| in_arc(lon, cusps[i], cusps[(i + 1) % 12]))
                .count();
            assert_eq!(containing, 1, "longitude {lon}");
            let a = assign_house(lon, &cusps);
            assert!(in_arc(lon, cusps[a.house as usize - 1], cusps[a.house as usize % 12]));
            counts[a.house as usize - 1] += 1;
        }
        assert!(counts.iter().all(|&c| c > 0));
        assert_eq!(counts.iter().sum::<usize>(), 3600);
    }
}
