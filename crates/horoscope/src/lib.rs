//! Natal charts and daily transit reports.
//!
//! Pipeline: [`time`] → [`ephemeris`] → [`houses`] / [`western`] →
//! [`aspects`] → [`chart`] → [`transit`] → [`report`]. [`engine::Engine`]
//! drives it against a pluggable [`ephemeris::EphemerisProvider`].

pub mod angles;
pub mod aspects;
pub mod cache;
pub mod chart;
pub mod engine;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod report;
pub mod time;
pub mod transit;
pub mod western;

pub use cache::{ChartCache, ChartKey};
pub use chart::{ChartWarning, NatalChart};
pub use engine::{Engine, EngineOptions};
pub use ephemeris::{build_provider, AnalyticEphemeris, EphemerisProvider, ProviderKind};
pub use error::ChartError;
pub use report::{Report, ReportSettings};
pub use time::{BirthMoment, BirthTime, ZoneSpec};
pub use transit::{ScoringPolicy, TransitHit};
