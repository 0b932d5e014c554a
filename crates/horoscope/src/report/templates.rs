//! Declarative phrasing tables.
//!
//! Presentation layers are expected to map template ids to their own text;
//! the bundled text is a plain default. Choice among alternatives is a hash
//! of the report date, section and slot, so the same day always reads the same.

use crate::aspects::AspectNature;
use crate::report::areas::LifeArea;
use crate::report::builder::Tone;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub text: &'static str,
}

const fn t(id: &'static str, text: &'static str) -> Template {
    Template { id, text }
}

/// A template id together with its filled-in default text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    pub template_id: String,
    pub text: String,
}

const HARMONIOUS: &[Template] = &[
    t("transit.harmonious.flow", "{transit} {aspect} your {target}: things move with less effort."),
    t("transit.harmonious.open", "{transit} {aspect} your {target} opens a door worth walking through."),
    t("transit.harmonious.support", "Support arrives as {transit} {aspect} your {target}."),
];

const CHALLENGING: &[Template] = &[
    t("transit.challenging.friction", "{transit} {aspect} your {target}: expect some friction."),
    t("transit.challenging.pace", "{transit} {aspect} your {target}; slow down before deciding."),
    t("transit.challenging.test", "A test of patience as {transit} {aspect} your {target}."),
];

const NEUTRAL: &[Template] = &[
    t("transit.neutral.focus", "{transit} {aspect} your {target} brings this theme into focus."),
    t("transit.neutral.merge", "{transit} meets your {target}; a fresh start around it is possible."),
];

const QUIET_SECTION: &[(LifeArea, &[Template])] = &[
    (
        LifeArea::General,
        &[
            t("section.general.quiet", "No major influences today."),
            t("section.general.steady", "A steady day without strong currents."),
        ],
    ),
    (
        LifeArea::Love,
        &[
            t("section.love.quiet", "Relationships are on an even keel."),
            t("section.love.steady", "Nothing pressing in matters of the heart."),
        ],
    ),
    (
        LifeArea::Work,
        &[
            t("section.work.quiet", "Routine work goes on as usual."),
            t("section.work.steady", "No strong pull at work today."),
        ],
    ),
    (
        LifeArea::Health,
        &[
            t("section.health.quiet", "Keep your usual rhythm of rest and activity."),
            t("section.health.steady", "Energy levels look stable."),
        ],
    ),
    (
        LifeArea::Growth,
        &[
            t("section.growth.quiet", "A good day for review rather than new study."),
            t("section.growth.steady", "Learning continues at its own pace."),
        ],
    ),
];

const TONES: &[(Tone, &[Template])] = &[
    (
        Tone::Harmonious,
        &[
            t("slot.harmonious.easy", "An easy stretch of the day."),
            t("slot.harmonious.good", "Good timing for what matters to you."),
        ],
    ),
    (
        Tone::Challenging,
        &[
            t("slot.challenging.careful", "Take extra care during this part of the day."),
            t("slot.challenging.patience", "Patience pays off in these hours."),
        ],
    ),
    (
        Tone::Mixed,
        &[
            t("slot.mixed.balance", "Ups and downs balance out."),
            t("slot.mixed.choose", "Pick your moments carefully."),
        ],
    ),
    (
        Tone::Quiet,
        &[
            t("slot.quiet.calm", "A calm period."),
            t("slot.quiet.rest", "Little is stirring; use the time as you like."),
        ],
    ),
];

pub fn transit_templates(nature: AspectNature) -> &'static [Template] {
    match nature {
        AspectNature::Harmonious => HARMONIOUS,
        AspectNature::Challenging => CHALLENGING,
        AspectNature::Neutral => NEUTRAL,
    }
}

pub fn quiet_section_templates(area: LifeArea) -> &'static [Template] {
    QUIET_SECTION
        .iter()
        .find(|(a, _)| *a == area)
        .map(|(_, list)| *list)
        .unwrap_or(&[])
}

pub fn tone_templates(tone: Tone) -> &'static [Template] {
    TONES
        .iter()
        .find(|(candidate, _)| *candidate == tone)
        .map(|(_, list)| *list)
        .unwrap_or(&[])
}

/// Stable index in `0..len` derived from SHA-256 of `date|section|slot`.
pub fn seeded_index(date: NaiveDate, section: &str, slot: &str, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let mut hasher = Sha256::new();
    hasher.update(date.format("%Y-%m-%d").to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(section.as_bytes());
    hasher.update(b"|");
    hasher.update(slot.as_bytes());
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % len as u64) as usize
}

pub fn pick(
    templates: &'static [Template],
    date: NaiveDate,
    section: &str,
    slot: &str,
) -> Option<&'static Template> {
    templates.get(seeded_index(date, section, slot, templates.len()))
}

/// Substitutes `{name}` placeholders from `values`.
pub fn render(template: &Template, values: &[(&str, &str)]) -> Rendered {
    let text = values.iter().fold(template.text.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    });
    Rendered {
        template_id: template.id.to_string(),
        text,
    }
}
