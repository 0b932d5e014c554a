use crate::aspects::{AspectNature, ChartPoint};
use crate::chart::NatalChart;
use crate::report::areas::{area_for_house, LifeArea};
use crate::report::moon::MoonSummary;
use crate::report::templates::{
    pick, quiet_section_templates, render, tone_templates, transit_templates, Rendered,
};
use crate::transit::TransitHit;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Total slot score below which a slot reads as quiet.
pub const QUIET_SCORE: f64 = 0.25;
/// How far one side must outweigh the other to set the tone.
pub const TONE_RATIO: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Hits considered for the report
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySlot {
    Morning,
    Day,
    Evening,
}

impl DaySlot {
    pub const ALL: [DaySlot; 3] = [DaySlot::Morning, DaySlot::Day, DaySlot::Evening];

    /// Local wall-clock time the slot is sampled at.
    pub fn local_time(self) -> NaiveTime {
        let hour = match self {
            DaySlot::Morning => 8,
            DaySlot::Day => 13,
            DaySlot::Evening => 19,
        };
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DaySlot::Morning => "morning",
            DaySlot::Day => "day",
            DaySlot::Evening => "evening",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Harmonious,
    Challenging,
    Mixed,
    Quiet,
}

/// Ranked hits sampled at one slot instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotHits {
    pub slot: DaySlot,
    pub at: DateTime<Utc>,
    pub hits: Vec<TransitHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    #[serde(flatten)]
    pub hit: TransitHit,
    pub area: LifeArea,
    #[serde(flatten)]
    pub rendered: Rendered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub area: LifeArea,
    pub items: Vec<ReportItem>,
    /// Filled only when `items` is empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Rendered>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotSummary {
    pub slot: DaySlot,
    pub at: DateTime<Utc>,
    pub score: f64,
    pub harmonious: f64,
    pub challenging: f64,
    pub tone: Tone,
    #[serde(flatten)]
    pub rendered: Rendered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Local calendar date the report is for
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    /// Natal chart was computed without a birth time or houses
    pub approx: bool,
    pub degraded: bool,
    pub key_transits: Vec<ReportItem>,
    pub sections: Vec<ReportSection>,
    pub moon: Option<MoonSummary>,
    pub time_of_day: Vec<TimeSlotSummary>,
}

/// Sum of scores by aspect nature, then the tone they imply.
pub fn slot_tone(hits: &[TransitHit]) -> (f64, f64, f64, Tone) {
    let total: f64 = hits.iter().map(|h| h.score).sum();
    let side = |nature: AspectNature| -> f64 {
        hits.iter()
            .filter(|h| h.aspect.nature() == nature)
            .map(|h| h.score)
            .sum()
    };
    let harmonious = side(AspectNature::Harmonious);
    let challenging = side(AspectNature::Challenging);

    let tone = if total < QUIET_SCORE {
        Tone::Quiet
    } else if harmonious > 0.0 && harmonious >= challenging * TONE_RATIO {
        Tone::Harmonious
    } else if challenging > 0.0 && challenging >= harmonious * TONE_RATIO {
        Tone::Challenging
    } else {
        Tone::Mixed
    };
    (total, harmonious, challenging, tone)
}

fn point_label(point: ChartPoint) -> String {
    let raw = point.as_str();
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Assembles a [`Report`] from already-ranked hits. Pure.
pub struct ReportBuilder {
    settings: ReportSettings,
}

impl ReportBuilder {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    pub fn build(
        &self,
        date: NaiveDate,
        generated_at: DateTime<Utc>,
        natal: &NatalChart,
        hits: &[TransitHit],
        moon: Option<MoonSummary>,
        slots: &[SlotHits],
    ) -> Report {
        let top = &hits[..hits.len().min(self.settings.top_n)];

        let key_transits = top
            .iter()
            .enumerate()
            .map(|(i, hit)| self.item(date, "key", i, hit))
            .collect();

        let sections = LifeArea::ALL
            .iter()
            .map(|&area| {
                let items: Vec<ReportItem> = top
                    .iter()
                    .filter(|h| area_for_house(h.house) == area)
                    .take(self.settings.max_items_per_section)
                    .enumerate()
                    .map(|(i, hit)| self.item(date, area.as_str(), i, hit))
                    .collect();
                let placeholder = if items.is_empty() {
                    pick(quiet_section_templates(area), date, area.as_str(), "empty")
                        .map(|t| render(t, &[]))
                } else {
                    None
                };
                ReportSection {
                    area,
                    items,
                    placeholder,
                }
            })
            .collect();

        let time_of_day = slots
            .iter()
            .map(|s| {
                let slot_top = &s.hits[..s.hits.len().min(self.settings.top_n)];
                let (score, harmonious, challenging, tone) = slot_tone(slot_top);
                let rendered = pick(tone_templates(tone), date, "time_of_day", s.slot.as_str())
                    .map(|t| render(t, &[]))
                    .unwrap_or_else(|| Rendered {
                        template_id: String::new(),
                        text: String::new(),
                    });
                TimeSlotSummary {
                    slot: s.slot,
                    at: s.at,
                    score,
                    harmonious,
                    challenging,
                    tone,
                    rendered,
                }
            })
            .collect();

        Report {
            date,
            generated_at,
            approx: natal.approx,
            degraded: natal.degraded,
            key_transits,
            sections,
            moon,
            time_of_day,
        }
    }

    fn item(&self, date: NaiveDate, section: &str, index: usize, hit: &TransitHit) -> ReportItem {
        let transit = point_label(ChartPoint::Body(hit.transiting));
        let target = point_label(hit.target);
        let rendered = pick(
            transit_templates(hit.aspect.nature()),
            date,
            section,
            &index.to_string(),
        )
        .map(|t| {
            render(
                t,
                &[
                    ("transit", transit.as_str()),
                    ("aspect", hit.aspect.as_str()),
                    ("target", target.as_str()),
                ],
            )
        })
        .unwrap_or_else(|| Rendered {
            template_id: String::new(),
            text: String::new(),
        });
        ReportItem {
            hit: hit.clone(),
            area: area_for_house(hit.house),
            rendered,
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(ReportSettings::default())
    }
}
