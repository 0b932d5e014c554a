pub mod analytic;
#[cfg(feature = "swisseph")]
pub mod adapter;
pub mod types;

pub use analytic::AnalyticEphemeris;
#[cfg(feature = "swisseph")]
pub use adapter::SwissEphemerisAdapter;
pub use types::{
    Body, BodyPosition, BodyStatus, EphemerisError, EphemerisSnapshot, GeoLocation, HouseSystem,
};

use crate::time::JulianDay;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Source of body positions and house cusps.
///
/// Implementations must be pure: the same arguments always give the same
/// snapshot. Longitudes are in [0, 360) and all ten bodies are returned, with
/// failed ones marked [`BodyStatus::Unavailable`]. `observer = None` means no
/// houses are wanted and `houses` must be `None`.
#[async_trait]
pub trait EphemerisProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn compute(
        &self,
        jd: JulianDay,
        observer: Option<GeoLocation>,
        system: HouseSystem,
    ) -> Result<EphemerisSnapshot, EphemerisError>;
}

/// Backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Analytic,
    Swiss,
}

const PROVIDERS: &[(&str, ProviderKind)] = &[
    ("analytic", ProviderKind::Analytic),
    ("swiss", ProviderKind::Swiss),
];

impl FromStr for ProviderKind {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PROVIDERS
            .iter()
            .find(|(name, _)| *name == s.trim().to_lowercase())
            .map(|(_, kind)| *kind)
            .ok_or_else(|| EphemerisError::UnknownProvider {
                name: s.to_string(),
                valid: PROVIDERS.iter().map(|(name, _)| name.to_string()).collect(),
            })
    }
}

/// Build the configured backend.
pub fn build_provider(
    kind: ProviderKind,
    ephemeris_path: Option<PathBuf>,
) -> Result<Arc<dyn EphemerisProvider>, EphemerisError> {
    match kind {
        ProviderKind::Analytic => {
            if ephemeris_path.is_some() {
                log::debug!("analytic ephemeris ignores the configured data path");
            }
            Ok(Arc::new(AnalyticEphemeris::new()))
        }
        #[cfg(feature = "swisseph")]
        ProviderKind::Swiss => Ok(Arc::new(SwissEphemerisAdapter::new(ephemeris_path)?)),
        #[cfg(not(feature = "swisseph"))]
        ProviderKind::Swiss => {
            let _ = ephemeris_path;
            Err(EphemerisError::ProviderUnavailable {
                message: "built without the `swisseph` feature".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parses() {
        assert_eq!("Analytic".parse::<ProviderKind>().unwrap(), ProviderKind::Analytic);
        assert_eq!("swiss".parse::<ProviderKind>().unwrap(), ProviderKind::Swiss);
        assert!("jpl".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_builds_analytic_provider() {
        let provider = build_provider(ProviderKind::Analytic, None).unwrap();
        assert_eq!(provider.name(), "analytic");
    }

    #[cfg(not(feature = "swisseph"))]
    #[test]
    fn test_swiss_needs_feature() {
        assert!(matches!(
            build_provider(ProviderKind::Swiss, None),
            Err(EphemerisError::ProviderUnavailable { .. })
        ));
    }
}
