//! Command-line strings to birth data.

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use horoscope::ephemeris::{GeoLocation, HouseSystem};
use horoscope::time::{BirthMoment, BirthTime, ZoneSpec};

/// `HH:MM` or `HH:MM:SS[.fff]`.
pub fn parse_clock(text: &str) -> anyhow::Result<BirthTime> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        anyhow::bail!("Expected HH:MM or HH:MM:SS, got '{text}'");
    }
    let hour: u32 = parts[0].parse().with_context(|| format!("Bad hour in '{text}'"))?;
    let minute: u32 = parts[1].parse().with_context(|| format!("Bad minute in '{text}'"))?;
    let second: f64 = match parts.get(2) {
        Some(s) => s.parse().with_context(|| format!("Bad second in '{text}'"))?,
        None => 0.0,
    };
    Ok(BirthTime::new(hour, minute, second))
}

/// `±HH:MM`, `±HHMM` or `Z`, as minutes east of Greenwich.
pub fn parse_offset(text: &str) -> anyhow::Result<i32> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("z") {
        return Ok(0);
    }
    let (sign, rest) = match text.chars().next() {
        Some('+') => (1, &text[1..]),
        Some('-') => (-1, &text[1..]),
        _ => anyhow::bail!("Offset must start with + or -, got '{text}'"),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("Expected an offset like +03:00, got '{text}'");
    }
    let hours: i32 = digits[..2].parse()?;
    let minutes: i32 = digits[2..].parse()?;
    if hours > 18 || minutes > 59 {
        anyhow::bail!("Offset out of range: '{text}'");
    }
    Ok(sign * (hours * 60 + minutes))
}

pub fn parse_now(text: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match text {
        Some(t) => Ok(DateTime::parse_from_rfc3339(t)
            .with_context(|| format!("Expected an RFC 3339 timestamp, got '{t}'"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

pub struct BirthInput<'a> {
    pub date: NaiveDate,
    pub time: Option<&'a str>,
    pub lat: f64,
    pub lon: f64,
    pub tz: Option<&'a str>,
    pub offset: Option<&'a str>,
    pub house_system: HouseSystem,
}

pub fn birth_moment(input: BirthInput<'_>) -> anyhow::Result<BirthMoment> {
    let time = input.time.map(parse_clock).transpose()?;
    let zone = match (input.tz, input.offset) {
        (Some(name), _) => ZoneSpec::Iana(name.to_string()),
        (None, Some(offset)) => ZoneSpec::Offset {
            minutes: parse_offset(offset)?,
        },
        (None, None) => ZoneSpec::Unresolved,
    };
    Ok(BirthMoment {
        date: input.date,
        time,
        zone,
        location: GeoLocation {
            lat: input.lat,
            lon: input.lon,
        },
        house_system: input.house_system,
    })
}
