use crate::ephemeris::types::EphemerisError;
use crate::time::TimeError;
use thiserror::Error;

/// Failures that stop a chart or report from being produced at all.
///
/// Reduced-precision results are not errors; they come back as a chart
/// carrying [`crate::chart::ChartWarning`]s.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Invalid time: {0}")]
    InvalidTime(#[from] TimeError),
    #[error("Invalid location: lat {lat}, lon {lon}")]
    InvalidLocation { lat: f64, lon: f64 },
    #[error("Chart computation failed: {0}")]
    ProviderUnavailable(#[from] EphemerisError),
    #[error("Ephemeris provider '{provider}' timed out after {timeout_ms} ms")]
    ProviderTimeout { provider: String, timeout_ms: u64 },
}

pub type Result<T> = std::result::Result<T, ChartError>;
