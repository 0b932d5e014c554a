//! Time normalization: civil birth data to a Universal Time Julian Day.

use crate::ephemeris::types::{GeoLocation, HouseSystem};
use chrono::{
    DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 TT, used here on the UT scale).
pub const J2000: f64 = 2_451_545.0;

/// Errors raised while turning civil time into a UT instant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    #[error("Unknown timezone: {zone}")]
    UnknownZone { zone: String },
    #[error("Timezone is unresolved and no UTC offset was supplied")]
    UnresolvedZone,
    #[error("UTC offset out of range: {minutes} minutes")]
    InvalidOffset { minutes: i32 },
    #[error("Invalid civil time {hour:02}:{minute:02}:{second}")]
    InvalidClock { hour: u32, minute: u32, second: f64 },
    #[error("Local time {local} does not exist in {zone}")]
    NonexistentLocalTime { local: NaiveDateTime, zone: String },
    #[error("Local time {local} is ambiguous in {zone}")]
    AmbiguousLocalTime { local: NaiveDateTime, zone: String },
}

/// Continuous day count on the UT scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JulianDay(pub f64);

impl JulianDay {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn from_datetime_utc(dt: &DateTime<Utc>) -> Self {
        let second = dt.second() as f64 + dt.nanosecond() as f64 / 1e9;
        julian_day(dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute(), second)
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn centuries_since_j2000(self) -> f64 {
        (self.0 - J2000) / 36_525.0
    }

    pub fn offset_days(self, days: f64) -> Self {
        Self(self.0 + days)
    }
}

impl fmt::Display for JulianDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.6}", self.0)
    }
}

/// Gregorian-calendar Julian Day for a UT civil instant.
///
/// January and February count as months 13 and 14 of the previous year; the
/// fractional day is `(hour + minute/60 + second/3600) / 24`.
pub fn julian_day(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> JulianDay {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let y = y as f64;
    let m = m as f64;
    let century = (y / 100.0).floor();
    let correction = 2.0 - century + (century / 4.0).floor();
    let fraction = (hour as f64 + minute as f64 / 60.0 + second / 3600.0) / 24.0;

    JulianDay(
        (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day as f64 + correction
            - 1524.5
            + fraction,
    )
}

/// How the wall-clock time of a birth relates to UT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSpec {
    /// IANA name such as `Europe/Moscow`, resolved through the tz database.
    Iana(String),
    /// Explicit offset east of Greenwich.
    Offset { minutes: i32 },
    /// Lookup failed upstream; only usable together with an unknown birth time.
    Unresolved,
}

/// Wall-clock time of birth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthTime {
    pub hour: u32,
    pub minute: u32,
    #[serde(default)]
    pub second: f64,
}

impl BirthTime {
    pub const NOON: BirthTime = BirthTime {
        hour: 12,
        minute: 0,
        second: 0.0,
    };

    pub fn new(hour: u32, minute: u32, second: f64) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    fn validate(&self) -> Result<(), TimeError> {
        if self.hour > 23 || self.minute > 59 || !(0.0..60.0).contains(&self.second) {
            return Err(TimeError::InvalidClock {
                hour: self.hour,
                minute: self.minute,
                second: self.second,
            });
        }
        Ok(())
    }
}

/// Everything needed to cast a natal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthMoment {
    pub date: NaiveDate,
    /// `None` means the birth time is unknown.
    pub time: Option<BirthTime>,
    pub zone: ZoneSpec,
    pub location: GeoLocation,
    #[serde(default)]
    pub house_system: HouseSystem,
}

/// A birth moment pinned to a single UT instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMoment {
    pub ut: DateTime<Utc>,
    pub julian_day: JulianDay,
    /// True when the clock time was assumed (unknown birth time).
    pub approx: bool,
}

/// Convert a birth moment to UT and its Julian Day.
///
/// An unknown birth time is placed at local noon and flagged `approx`. If the
/// zone is also unresolved, local mean time at the birth longitude stands in
/// for the civil offset.
pub fn normalize(moment: &BirthMoment) -> Result<NormalizedMoment, TimeError> {
    let (clock, approx) = match &moment.time {
        Some(t) => (t.clone(), false),
        None => (BirthTime::NOON, true),
    };
    clock.validate()?;

    let whole = clock.second.floor();
    let nanos = (((clock.second - whole) * 1e9).round() as u32).min(999_999_999);
    let naive = moment
        .date
        .and_hms_nano_opt(clock.hour, clock.minute, whole as u32, nanos)
        .ok_or(TimeError::InvalidClock {
            hour: clock.hour,
            minute: clock.minute,
            second: clock.second,
        })?;

    if moment.zone == ZoneSpec::Unresolved {
        if !approx {
            return Err(TimeError::UnresolvedZone);
        }
        log::warn!("birth zone unresolved, assuming local mean time for unknown birth time");
    }
    let ut = local_to_utc(&naive, &moment.zone, moment.location, LocalTimePolicy::Strict)?;

    Ok(NormalizedMoment {
        ut,
        julian_day: JulianDay::from_datetime_utc(&ut),
        approx,
    })
}

/// Treatment of wall-clock times that a DST change skips or repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTimePolicy {
    /// Skipped and repeated times are errors.
    Strict,
    /// Repeated times take the earlier instant; skipped times are read with
    /// the offset in force before the change.
    Earliest,
}

/// The UT instant of a local wall-clock time in `zone`.
///
/// An unresolved zone is read as local mean time at `location`.
pub fn local_to_utc(
    naive: &NaiveDateTime,
    zone: &ZoneSpec,
    location: GeoLocation,
    policy: LocalTimePolicy,
) -> Result<DateTime<Utc>, TimeError> {
    match zone {
        ZoneSpec::Offset { minutes } => from_offset(naive, *minutes, policy),
        ZoneSpec::Iana(name) => {
            let tz: Tz = name.parse().map_err(|_| TimeError::UnknownZone {
                zone: name.clone(),
            })?;
            resolve_local(&tz, naive, name, policy)
        }
        ZoneSpec::Unresolved => from_offset(naive, (location.lon * 4.0).round() as i32, policy),
    }
}

fn from_offset(
    naive: &NaiveDateTime,
    minutes: i32,
    policy: LocalTimePolicy,
) -> Result<DateTime<Utc>, TimeError> {
    let offset = minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(TimeError::InvalidOffset { minutes })?;
    resolve_local(&offset, naive, &offset.to_string(), policy)
}

fn resolve_local<T: TimeZone>(
    tz: &T,
    naive: &NaiveDateTime,
    zone: &str,
    policy: LocalTimePolicy,
) -> Result<DateTime<Utc>, TimeError> {
    let nonexistent = || TimeError::NonexistentLocalTime {
        local: *naive,
        zone: zone.to_string(),
    };
    match (tz.from_local_datetime(naive), policy) {
        (LocalResult::Single(dt), _) => Ok(dt.with_timezone(&Utc)),
        (LocalResult::Ambiguous(earliest, _), LocalTimePolicy::Earliest) => {
            Ok(earliest.with_timezone(&Utc))
        }
        (LocalResult::Ambiguous(_, _), LocalTimePolicy::Strict) => {
            Err(TimeError::AmbiguousLocalTime {
                local: *naive,
                zone: zone.to_string(),
            })
        }
        (LocalResult::None, LocalTimePolicy::Earliest) => {
            // Gaps are at most a few hours wide.
            let before = *naive - chrono::Duration::hours(GAP_LOOKBACK_HOURS);
            let offset = tz
                .from_local_datetime(&before)
                .earliest()
                .map(|dt| dt.offset().fix().local_minus_utc())
                .ok_or_else(nonexistent)?;
            Ok((*naive - chrono::Duration::seconds(offset as i64)).and_utc())
        }
        (LocalResult::None, LocalTimePolicy::Strict) => Err(nonexistent()),
    }
}

const GAP_LOOKBACK_HOURS: i64 = 3;

/// Seconds east of UT in force for `zone` at the instant `at`.
///
/// An unresolved zone falls back to local mean time at `location`.
pub fn utc_offset_seconds(
    zone: &ZoneSpec,
    location: GeoLocation,
    at: DateTime<Utc>,
) -> Result<i32, TimeError> {
    match zone {
        ZoneSpec::Offset { minutes } => minutes
            .checked_mul(60)
            .filter(|s| s.abs() < 86_400)
            .ok_or(TimeError::InvalidOffset { minutes: *minutes }),
        ZoneSpec::Iana(name) => {
            let tz: Tz = name.parse().map_err(|_| TimeError::UnknownZone {
                zone: name.clone(),
            })?;
            Ok(tz.offset_from_utc_datetime(&at.naive_utc()).fix().local_minus_utc())
        }
        ZoneSpec::Unresolved => Ok((location.lon * 240.0).round() as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moment(time: Option<BirthTime>, zone: ZoneSpec) -> BirthMoment {
        BirthMoment {
            date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            time,
            zone,
            location: GeoLocation {
                lat: 55.7558,
                lon: 37.6173,
            },
            house_system: HouseSystem::Placidus,
        }
    }

    #[test]
    fn test_j2000_epoch() {
        assert_eq!(julian_day(2000, 1, 1, 12, 0, 0.0).value(), J2000);
    }

    #[test]
    fn test_known_dates() {
        // Meeus, Astronomical Algorithms, example 7.a
        let jd = julian_day(1957, 10, 4, 19, 26, 24.0);
        assert!((jd.value() - 2_436_116.31).abs() < 1e-6);
        assert_eq!(julian_day(1987, 1, 27, 0, 0, 0.0).value(), 2_446_822.5);
        assert_eq!(julian_day(1600, 12, 31, 0, 0, 0.0).value(), 2_305_812.5);
    }

    #[test]
    fn test_fractional_seconds_are_kept() {
        let a = julian_day(2024, 3, 20, 3, 6, 0.0);
        let b = julian_day(2024, 3, 20, 3, 6, 0.5);
        assert!(((b.value() - a.value()) * 86_400.0 - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_offset_converts_to_ut() {
        let m = moment(Some(BirthTime::new(12, 0, 0.0)), ZoneSpec::Offset { minutes: 180 });
        let n = normalize(&m).unwrap();
        assert_eq!(n.ut.hour(), 9);
        assert!(!n.approx);
        assert!((n.julian_day.value() - (J2000 - 3.0 / 24.0)).abs() < 1e-9);
    }

    #[test]
    fn test_iana_zone_matches_offset() {
        let by_name = normalize(&moment(
            Some(BirthTime::new(12, 0, 0.0)),
            ZoneSpec::Iana("Europe/Moscow".into()),
        ))
        .unwrap();
        let by_offset = normalize(&moment(
            Some(BirthTime::new(12, 0, 0.0)),
            ZoneSpec::Offset { minutes: 180 },
        ))
        .unwrap();
        assert_eq!(by_name.julian_day, by_offset.julian_day);
    }

    #[test]
    fn test_normalize_is_pure() {
        let m = moment(Some(BirthTime::new(7, 45, 12.25)), ZoneSpec::Offset { minutes: -300 });
        let a = normalize(&m).unwrap().julian_day.value();
        let b = normalize(&m).unwrap().julian_day.value();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_unresolved_zone_is_rejected_for_known_time() {
        let m = moment(Some(BirthTime::new(12, 0, 0.0)), ZoneSpec::Unresolved);
        assert_eq!(normalize(&m), Err(TimeError::UnresolvedZone));
    }

    #[test]
    fn test_unknown_zone_name_is_rejected() {
        let m = moment(Some(BirthTime::new(12, 0, 0.0)), ZoneSpec::Iana("Mars/Olympus".into()));
        assert!(matches!(normalize(&m), Err(TimeError::UnknownZone { .. })));
    }

    #[test]
    fn test_unknown_time_defaults_to_local_noon() {
        let n = normalize(&moment(None, ZoneSpec::Offset { minutes: 180 })).unwrap();
        assert!(n.approx);
        assert_eq!(n.ut.hour(), 9);
    }

    #[test]
    fn test_dst_gap_is_invalid() {
        let mut m = moment(
            Some(BirthTime::new(2, 30, 0.0)),
            ZoneSpec::Iana("America/New_York".into()),
        );
        m.date = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap();
        assert!(matches!(
            normalize(&m),
            Err(TimeError::NonexistentLocalTime { .. })
        ));
    }

    #[test]
    fn test_invalid_clock_is_rejected() {
        let m = moment(Some(BirthTime::new(24, 0, 0.0)), ZoneSpec::Offset { minutes: 0 });
        assert!(matches!(normalize(&m), Err(TimeError::InvalidClock { .. })));
    }

    #[test]
    fn test_dst_overlap_is_ambiguous() {
        let mut m = moment(
            Some(BirthTime::new(1, 30, 0.0)),
            ZoneSpec::Iana("America/New_York".into()),
        );
        m.date = NaiveDate::from_ymd_opt(2021, 11, 7).unwrap();
        assert!(matches!(
            normalize(&m),
            Err(TimeError::AmbiguousLocalTime { .. })
        ));
    }

    #[test]
    fn test_earliest_policy_resolves_dst_edges() {
        let new_york = ZoneSpec::Iana("America/New_York".into());
        let loc = GeoLocation { lat: 40.71, lon: -74.0 };
        let at = |y, mo, d, h, mi| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, 0)
                .unwrap()
        };

        // 01:30 happens twice on 2021-11-07; the EDT reading comes first
        let overlap = local_to_utc(&at(2021, 11, 7, 1, 30), &new_york, loc, LocalTimePolicy::Earliest);
        assert_eq!(overlap.unwrap(), Utc.with_ymd_and_hms(2021, 11, 7, 5, 30, 0).unwrap());

        // 02:30 is skipped on 2021-03-14 and read as EST
        let gap = local_to_utc(&at(2021, 3, 14, 2, 30), &new_york, loc, LocalTimePolicy::Earliest);
        assert_eq!(gap.unwrap(), Utc.with_ymd_and_hms(2021, 3, 14, 7, 30, 0).unwrap());

        // Los Angeles switches at 10:00 UT, after 08:00 read as UT
        let la = ZoneSpec::Iana("America/Los_Angeles".into());
        let morning = local_to_utc(&at(2021, 3, 14, 8, 0), &la, loc, LocalTimePolicy::Strict);
        assert_eq!(morning.unwrap(), Utc.with_ymd_and_hms(2021, 3, 14, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_utc_offset_follows_dst_and_falls_back_to_mean_time() {
        let loc = GeoLocation { lat: 51.5, lon: -0.12 };
        let london = ZoneSpec::Iana("Europe/London".to_string());
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(utc_offset_seconds(&london, loc, winter).unwrap(), 0);
        assert_eq!(utc_offset_seconds(&london, loc, summer).unwrap(), 3600);
        assert_eq!(
            utc_offset_seconds(&ZoneSpec::Offset { minutes: 180 }, loc, winter).unwrap(),
            10_800
        );
        let moscow = GeoLocation { lat: 55.75, lon: 37.5 };
        assert_eq!(utc_offset_seconds(&ZoneSpec::Unresolved, moscow, winter).unwrap(), 9000);
    }
}
