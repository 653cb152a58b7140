//! Settings sections other than `[resolution]`, which lives in
//! prism-contracts because the resolver reads it directly.
//!
//! Example in TOML:
//! ```toml
//! [cache]
//! ttl_seconds = 30
//!
//! [catalog]
//! path = "data/catalog.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default lifetime of the cached condition list.
pub const DEFAULT_TTL_SECONDS: i64 = 30;

/// `[cache]`: lifetime of the cached condition list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Seconds a non-forced conditions load may reuse the cached list.
    /// Zero disables reuse.
    pub ttl_seconds: i64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

/// `[catalog]`: where the catalog document comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// JSON catalog document. When absent, callers fall back to their
    /// built-in catalog.
    pub path: Option<PathBuf>,
}
