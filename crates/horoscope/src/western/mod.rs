pub mod rulers;
pub mod signs;

pub use rulers::sign_ruler;
pub use signs::{
    decan_index, tally, Element, ElementTally, Quality, QualityTally, Sign, SignPlacement,
};
