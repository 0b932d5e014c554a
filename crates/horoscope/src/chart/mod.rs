pub mod assembler;
pub mod types;

pub use assembler::{sanitize_snapshot, ChartAssembler};
pub use types::{ChartBody, ChartWarning, NatalChart};
