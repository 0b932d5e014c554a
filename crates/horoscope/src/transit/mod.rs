pub mod policy;
pub mod scorer;

pub use policy::ScoringPolicy;
pub use scorer::{
    compare_hits, orb_closeness, ChartTarget, TransitHit, TransitScorer, MIN_ORB_CLOSENESS,
};
