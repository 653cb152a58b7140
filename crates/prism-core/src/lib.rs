//! # prism-core
//!
//! Condition filtering, selection consistency, and patient-type-aware
//! recommendation resolution for the Prism clinical reference catalog.
//!
//! This crate provides:
//! - The boundary traits (`CatalogSource`, `ConditionValidator`)
//! - The pure stages: `filter`, `SelectionManager`, `RecommendationPlan`,
//!   and the availability annotator
//! - The `Browser` that runs them in order over one catalog snapshot
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prism_core::{Browser, traits::{CatalogSource, ConditionValidator}};
//! ```

pub mod availability;
pub mod browser;
pub mod cache;
pub mod details;
pub mod filter;
pub mod resolver;
pub mod selection;
pub mod traits;

pub use browser::{fetch_snapshot, Browser, CatalogStatus, ReloadTicket};
pub use cache::CachedSource;
pub use filter::{filter, FilterCriteria, FilterOptions};
pub use resolver::{resolve, RecommendationPlan};
pub use selection::{Selection, SelectionManager};
pub use traits::{load_concurrently, FetchedCatalog};
