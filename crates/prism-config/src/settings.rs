//! The top-level settings document.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use prism_contracts::{
    error::{PrismError, PrismResult},
    settings::ResolutionSettings,
};

use crate::sections::{CacheSettings, CatalogSettings};

/// Everything a Prism session can be configured with. Every section is
/// optional and falls back to its defaults.
///
/// ```rust,ignore
/// use prism_config::Settings;
///
/// let settings = Settings::from_file(Path::new("prism.toml"))?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resolution: ResolutionSettings,
    pub cache: CacheSettings,
    pub catalog: CatalogSettings,
}

impl Settings {
    /// Parse `s` as TOML.
    ///
    /// Returns `PrismError::ConfigError` if the TOML is malformed, does not
    /// match the expected shape, or sets a negative cache TTL.
    pub fn from_toml_str(s: &str) -> PrismResult<Self> {
        let settings: Settings = toml::from_str(s).map_err(|e| PrismError::ConfigError {
            reason: format!("failed to parse settings TOML: {}", e),
        })?;

        if settings.cache.ttl_seconds < 0 {
            return Err(PrismError::ConfigError {
                reason: format!(
                    "cache.ttl_seconds must not be negative, got {}",
                    settings.cache.ttl_seconds
                ),
            });
        }
        if Duration::try_seconds(settings.cache.ttl_seconds).is_none() {
            return Err(PrismError::ConfigError {
                reason: format!(
                    "cache.ttl_seconds is out of range, got {}",
                    settings.cache.ttl_seconds
                ),
            });
        }

        debug!(
            legacy_inference = settings.resolution.legacy_inference,
            ttl_seconds = settings.cache.ttl_seconds,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Read the file at `path` and parse it as TOML settings.
    pub fn from_file(path: &Path) -> PrismResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PrismError::ConfigError {
            reason: format!("failed to read settings file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The cache TTL as a duration.
    ///
    /// Values rejected by `from_toml_str` (negative or out of range) clamp to
    /// zero, which disables reuse.
    pub fn cache_ttl(&self) -> Duration {
        Duration::try_seconds(self.cache.ttl_seconds)
            .filter(|ttl| *ttl >= Duration::zero())
            .unwrap_or_else(Duration::zero)
    }
}
