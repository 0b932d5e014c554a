use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Relative locations tried when no explicit path is given.
pub const DEFAULT_PATHS: [&str; 2] = ["configs/horoscope.toml", "../../configs/horoscope.toml"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EphemerisSettings {
    /// `analytic` or `swiss`
    pub provider: String,
    /// Swiss Ephemeris data directory
    pub path: Option<PathBuf>,
    pub timeout_ms: u64,
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        Self {
            provider: "analytic".to_string(),
            path: None,
            timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// `placidus` or `whole_sign`
    pub house_system: String,
    pub include_quincunx: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            house_system: "placidus".to_string(),
            include_quincunx: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub top_n: usize,
    pub max_items_per_section: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            max_items_per_section: 5,
        }
    }
}

/// Everything in `horoscope.toml`. Strings are parsed by the consumer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HoroscopeSettings {
    pub ephemeris: EphemerisSettings,
    pub chart: ChartSettings,
    /// Aspect name to maximum orb in degrees
    pub orbs: HashMap<String, f64>,
    pub report: ReportSettings,
    /// File the settings came from; `None` means built-in defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

pub fn parse_settings(text: &str) -> anyhow::Result<HoroscopeSettings> {
    let settings: HoroscopeSettings =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse horoscope.toml: {e}"))?;
    if settings.ephemeris.timeout_ms == 0 {
        anyhow::bail!("ephemeris.timeout_ms must be greater than zero");
    }
    if settings.report.top_n == 0 || settings.report.max_items_per_section == 0 {
        anyhow::bail!("report.top_n and report.max_items_per_section must be greater than zero");
    }
    Ok(settings)
}

/// Loads settings from `explicit`, or the first of [`DEFAULT_PATHS`] that exists.
///
/// An explicit path must exist. With no explicit path and no file found the
/// defaults are returned.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<HoroscopeSettings> {
    if let Some(path) = explicit {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let mut settings = parse_settings(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        settings.source = Some(path.to_path_buf());
        return Ok(settings);
    }

    for p in &DEFAULT_PATHS {
        if let Ok(text) = fs::read_to_string(p) {
            let mut settings =
                parse_settings(&text).with_context(|| format!("Invalid config file {p}"))?;
            settings.source = Some(PathBuf::from(p));
            return Ok(settings);
        }
    }
    Ok(HoroscopeSettings::default())
}
