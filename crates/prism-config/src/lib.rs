//! # prism-config
//!
//! TOML settings for Prism sessions.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use prism_config::Settings;
//!
//! let settings = Settings::from_file(Path::new("prism.toml"))?;
//! // Pass `settings.resolution` to `prism_core::Browser::new(...)`.
//! ```
//!
//! ## Sections
//!
//! - `[resolution]`: legacy inference switch and the restriction marker
//! - `[cache]`: `ttl_seconds` for the cached condition list
//! - `[catalog]`: optional `path` to a JSON catalog document

pub mod sections;
pub mod settings;

pub use sections::{CacheSettings, CatalogSettings, DEFAULT_TTL_SECONDS};
pub use settings::Settings;

// ── Tests ─────────────────────────────────────────────────────────────────────
