pub mod areas;
pub mod builder;
pub mod moon;
pub mod templates;

pub use areas::{area_for_house, LifeArea};
pub use builder::{
    slot_tone, DaySlot, Report, ReportBuilder, ReportItem, ReportSection, ReportSettings,
    SlotHits, TimeSlotSummary, Tone,
};
pub use moon::{illumination, MoonPhase, MoonSummary};
pub use templates::{seeded_index, Rendered, Template};
