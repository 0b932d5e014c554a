//! Async facade tying the provider to the pure pipeline.

use crate::aspects::AspectSettings;
use crate::chart::{ChartAssembler, NatalChart};
use crate::ephemeris::types::{EphemerisSnapshot, GeoLocation, HouseSystem};
use crate::ephemeris::EphemerisProvider;
use crate::error::ChartError;
use crate::report::{DaySlot, MoonSummary, Report, ReportBuilder, ReportSettings, SlotHits};
use crate::time::{
    local_to_utc, normalize, utc_offset_seconds, BirthMoment, JulianDay, LocalTimePolicy,
};
use crate::transit::{ScoringPolicy, TransitHit, TransitScorer};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Default budget for one provider call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub aspects: AspectSettings,
    pub policy: ScoringPolicy,
    pub report: ReportSettings,
    pub timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            aspects: AspectSettings::default(),
            policy: ScoringPolicy::default(),
            report: ReportSettings::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Holds only immutable configuration, so one engine can serve concurrent
/// requests.
pub struct Engine {
    provider: Arc<dyn EphemerisProvider>,
    aspects: AspectSettings,
    policy: ScoringPolicy,
    report: ReportBuilder,
    timeout: Duration,
    assembler: ChartAssembler,
    scorer: TransitScorer,
}

impl Engine {
    pub fn new(provider: Arc<dyn EphemerisProvider>) -> Self {
        Self::with_options(provider, EngineOptions::default())
    }

    pub fn with_options(provider: Arc<dyn EphemerisProvider>, options: EngineOptions) -> Self {
        Self {
            provider,
            aspects: options.aspects,
            policy: options.policy,
            report: ReportBuilder::new(options.report),
            timeout: options.timeout,
            assembler: ChartAssembler::new(),
            scorer: TransitScorer::new(),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The single await point: one provider call bounded by the timeout.
    async fn snapshot(
        &self,
        jd: JulianDay,
        observer: Option<GeoLocation>,
        system: HouseSystem,
    ) -> Result<EphemerisSnapshot, ChartError> {
        let call = self.provider.compute(jd, observer, system);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(e)) => {
                log::warn!("provider '{}' failed: {}", self.provider.name(), e);
                Err(ChartError::ProviderUnavailable(e))
            }
            Err(_) => {
                log::warn!(
                    "provider '{}' timed out after {:?}",
                    self.provider.name(),
                    self.timeout
                );
                Err(ChartError::ProviderTimeout {
                    provider: self.provider.name().to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }

    /// Geography-independent positions at `now`.
    pub async fn sky_at(&self, now: DateTime<Utc>) -> Result<EphemerisSnapshot, ChartError> {
        self.snapshot(JulianDay::from_datetime_utc(&now), None, HouseSystem::default())
            .await
    }

    pub async fn natal_chart(&self, moment: &BirthMoment) -> Result<NatalChart, ChartError> {
        if !moment.location.is_valid() {
            return Err(ChartError::InvalidLocation {
                lat: moment.location.lat,
                lon: moment.location.lon,
            });
        }
        let normalized = normalize(moment)?;
        log::debug!(
            "natal chart for {} ({}{})",
            normalized.ut,
            normalized.julian_day,
            if normalized.approx { ", approx" } else { "" }
        );

        // No observer for an unknown birth time: houses would be fiction.
        let observer = (!normalized.approx).then_some(moment.location);
        let snapshot = self
            .snapshot(normalized.julian_day, observer, moment.house_system)
            .await?;
        self.assembler
            .assemble(moment, &normalized, snapshot, &self.aspects)
    }

    pub async fn transits(
        &self,
        natal: &NatalChart,
        now: DateTime<Utc>,
    ) -> Result<Vec<TransitHit>, ChartError> {
        let sky = self.sky_at(now).await?;
        Ok(self.scorer.score(natal, &sky, &self.aspects, &self.policy))
    }

    pub async fn moon_summary(&self, now: DateTime<Utc>) -> Result<Option<MoonSummary>, ChartError> {
        let sky = self.sky_at(now).await?;
        Ok(MoonSummary::from_snapshot(&sky))
    }

    /// Local date of `now` in the natal chart's zone.
    pub fn report_date(&self, natal: &NatalChart, now: DateTime<Utc>) -> Result<NaiveDate, ChartError> {
        let offset = utc_offset_seconds(&natal.moment.zone, natal.moment.location, now)?;
        Ok((now + ChronoDuration::seconds(offset as i64)).date_naive())
    }

    pub async fn daily_report(
        &self,
        natal: &NatalChart,
        now: DateTime<Utc>,
    ) -> Result<Report, ChartError> {
        let date = self.report_date(natal, now)?;
        let sky = self.sky_at(now).await?;
        let hits = self.scorer.score(natal, &sky, &self.aspects, &self.policy);
        let moon = MoonSummary::from_snapshot(&sky);

        let mut slots = Vec::with_capacity(DaySlot::ALL.len());
        for slot in DaySlot::ALL {
            let at = local_to_utc(
                &date.and_time(slot.local_time()),
                &natal.moment.zone,
                natal.moment.location,
                LocalTimePolicy::Earliest,
            )?;
            let slot_sky = self.sky_at(at).await?;
            slots.push(SlotHits {
                slot,
                at,
                hits: self
                    .scorer
                    .score(natal, &slot_sky, &self.aspects, &self.policy),
            });
        }

        Ok(self.report.build(date, now, natal, &hits, moon, &slots))
    }
}
