use serde::{Deserialize, Serialize};
use std::fmt;

/// Report section a transit is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeArea {
    General,
    Love,
    Work,
    Health,
    Growth,
}

impl LifeArea {
    /// Section order in a report.
    pub const ALL: [LifeArea; 5] = [
        LifeArea::General,
        LifeArea::Love,
        LifeArea::Work,
        LifeArea::Health,
        LifeArea::Growth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LifeArea::General => "general",
            LifeArea::Love => "love",
            LifeArea::Work => "work",
            LifeArea::Health => "health",
            LifeArea::Growth => "growth",
        }
    }
}

impl fmt::Display for LifeArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Houses that are not general.
const HOUSE_OVERRIDES: &[(u8, LifeArea)] = &[
    (1, LifeArea::Health),
    (2, LifeArea::Work),
    (3, LifeArea::Growth),
    (5, LifeArea::Love),
    (6, LifeArea::Work),
    (7, LifeArea::Love),
    (9, LifeArea::Growth),
    (10, LifeArea::Work),
    (11, LifeArea::Growth),
    (12, LifeArea::Health),
];

/// Section for a transiting body's natal house; no house means general.
pub fn area_for_house(house: Option<u8>) -> LifeArea {
    house
        .and_then(|h| HOUSE_OVERRIDES.iter().find(|(n, _)| *n == h))
        .map(|(_, area)| *area)
        .unwrap_or(LifeArea::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_and_default() {
        assert_eq!(area_for_house(Some(5)), LifeArea::Love);
        assert_eq!(area_for_house(Some(7)), LifeArea::Love);
        assert_eq!(area_for_house(Some(10)), LifeArea::Work);
        assert_eq!(area_for_house(Some(12)), LifeArea::Health);
        assert_eq!(area_for_house(Some(4)), LifeArea::General);
        assert_eq!(area_for_house(Some(8)), LifeArea::General);
        assert_eq!(area_for_house(None), LifeArea::General);
    }
}
