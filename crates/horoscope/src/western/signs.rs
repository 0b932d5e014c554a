//! Zodiac signs, elements and qualities.
//!
//! Each sign spans 30° starting at 0° Aries and is split into three 10° decans.

use crate::angles::normalize_degrees;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Cardinal,
    Fixed,
    Mutable,
}

const SIGN_ORDER: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

// (name, element, quality), indexed like SIGN_ORDER
const SIGN_TABLE: [(&str, Element, Quality); 12] = [
    ("Aries", Element::Fire, Quality::Cardinal),
    ("Taurus", Element::Earth, Quality::Fixed),
    ("Gemini", Element::Air, Quality::Mutable),
    ("Cancer", Element::Water, Quality::Cardinal),
    ("Leo", Element::Fire, Quality::Fixed),
    ("Virgo", Element::Earth, Quality::Mutable),
    ("Libra", Element::Air, Quality::Cardinal),
    ("Scorpio", Element::Water, Quality::Fixed),
    ("Sagittarius", Element::Fire, Quality::Mutable),
    ("Capricorn", Element::Earth, Quality::Cardinal),
    ("Aquarius", Element::Air, Quality::Fixed),
    ("Pisces", Element::Water, Quality::Mutable),
];

impl Sign {
    pub const ALL: [Sign; 12] = SIGN_ORDER;

    /// Sign index (0-11) from longitude
    pub fn index_of(longitude: f64) -> usize {
        ((normalize_degrees(longitude) / 30.0).floor() as usize).min(11)
    }

    pub fn from_longitude(longitude: f64) -> Sign {
        SIGN_ORDER[Self::index_of(longitude)]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        SIGN_TABLE[self.index()].0
    }

    pub fn element(self) -> Element {
        SIGN_TABLE[self.index()].1
    }

    pub fn quality(self) -> Quality {
        SIGN_TABLE[self.index()].2
    }

    /// Longitude where the sign begins.
    pub fn start(self) -> f64 {
        self.index() as f64 * 30.0
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A longitude expressed as sign plus degree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignPlacement {
    pub sign: Sign,
    /// Degrees within the sign, [0, 30)
    pub degree: f64,
    /// 1, 2 or 3
    pub decan: u8,
}

impl SignPlacement {
    pub fn from_longitude(longitude: f64) -> Self {
        let lon = normalize_degrees(longitude);
        let sign = Sign::from_longitude(lon);
        let degree = (lon - sign.start()).clamp(0.0, 30.0 - f64::EPSILON * 32.0);
        Self {
            sign,
            degree,
            decan: decan_index(degree),
        }
    }

    /// Degree-minute rendering, e.g. `9°52' Capricorn`.
    pub fn format_dms(&self) -> String {
        let total_minutes = (self.degree * 60.0).floor() as u32;
        format!("{}°{:02}' {}", total_minutes / 60, total_minutes % 60, self.sign)
    }
}

/// Given degree in sign, returns decan index 1, 2, or 3.
pub fn decan_index(degree_in_sign: f64) -> u8 {
    if degree_in_sign < 10.0 {
        1
    } else if degree_in_sign < 20.0 {
        2
    } else {
        3
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTally {
    pub fire: u32,
    pub earth: u32,
    pub air: u32,
    pub water: u32,
}

impl ElementTally {
    pub fn add(&mut self, element: Element) {
        match element {
            Element::Fire => self.fire += 1,
            Element::Earth => self.earth += 1,
            Element::Air => self.air += 1,
            Element::Water => self.water += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.fire + self.earth + self.air + self.water
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityTally {
    pub cardinal: u32,
    pub fixed: u32,
    pub mutable: u32,
}

impl QualityTally {
    pub fn add(&mut self, quality: Quality) {
        match quality {
            Quality::Cardinal => self.cardinal += 1,
            Quality::Fixed => self.fixed += 1,
            Quality::Mutable => self.mutable += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.cardinal + self.fixed + self.mutable
    }
}

/// Element and quality counts over a set of longitudes.
pub fn tally<I: IntoIterator<Item = f64>>(longitudes: I) -> (ElementTally, QualityTally) {
    let mut elements = ElementTally::default();
    let mut qualities = QualityTally::default();
    for lon in longitudes {
        let sign = Sign::from_longitude(lon);
        elements.add(sign.element());
        qualities.add(sign.quality());
    }
    (elements, qualities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_boundaries() {
        assert_eq!(Sign::from_longitude(0.0), Sign::Aries);
        assert_eq!(Sign::from_longitude(29.9999), Sign::Aries);
        assert_eq!(Sign::from_longitude(30.0), Sign::Taurus);
        assert_eq!(Sign::from_longitude(280.0), Sign::Capricorn);
        assert_eq!(Sign::from_longitude(359.999), Sign::Pisces);
        assert_eq!(Sign::from_longitude(-10.0), Sign::Pisces);
        assert_eq!(Sign::from_longitude(725.0), Sign::Aries);
    }

    #[test]
    fn test_signs_split_evenly_by_element_and_quality() {
        for element in [Element::Fire, Element::Earth, Element::Air, Element::Water] {
            assert_eq!(Sign::ALL.iter().filter(|s| s.element() == element).count(), 3);
        }
        for quality in [Quality::Cardinal, Quality::Fixed, Quality::Mutable] {
            assert_eq!(Sign::ALL.iter().filter(|s| s.quality() == quality).count(), 4);
        }
    }

    #[test]
    fn test_placement_degree_in_range() {
        let p = SignPlacement::from_longitude(279.87);
        assert_eq!(p.sign, Sign::Capricorn);
        assert!((p.degree - 9.87).abs() < 1e-9);
        assert_eq!(p.decan, 1);
        assert_eq!(p.format_dms(), "9°52' Capricorn");

        let edge = SignPlacement::from_longitude(359.999_999_999_999);
        assert!(edge.degree < 30.0);
        assert_eq!(edge.decan, 3);
    }

    #[test]
    fn test_get_decan_index() {
        assert_eq!(decan_index(0.0), 1);
        assert_eq!(decan_index(9.999), 1);
        assert_eq!(decan_index(10.0), 2);
        assert_eq!(decan_index(19.999), 2);
        assert_eq!(decan_index(20.0), 3);
        assert_eq!(decan_index(29.999), 3);
    }

    #[test]
    fn test_tally_counts_signs() {
        let (elements, qualities) = tally([5.0, 125.0, 280.0]);
        assert_eq!(elements.fire, 2);
        assert_eq!(elements.earth, 1);
        assert_eq!(qualities.cardinal, 2);
        assert_eq!(qualities.fixed, 1);
        assert_eq!(elements.total(), qualities.total());
    }
}
