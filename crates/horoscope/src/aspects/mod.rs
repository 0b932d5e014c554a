pub mod calculator;
pub mod types;

pub use calculator::AspectCalculator;
pub use types::{
    Aspect, AspectKind, AspectMatch, AspectNature, AspectSettings, AspectSettingsError,
    ChartPoint, PointPosition, Tightness, MODERATE_ORB, TIGHT_ORB,
};
