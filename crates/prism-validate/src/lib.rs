//! # prism-validate
//!
//! The data-validation boundary for Prism catalogs.
//!
//! 1. **Structural**: JSON catalog documents are checked against a JSON
//!    Schema via the `jsonschema` crate before deserialization
//!    ([`document::import_document`]).
//! 2. **Semantic**: [`rules::CatalogValidator`] implements
//!    [`prism_core::traits::ConditionValidator`] and rejects conditions the
//!    resolver cannot serve, such as those without phases.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use prism_validate::{CatalogValidator, import_str};
//!
//! let catalog = import_str(&std::fs::read_to_string("catalog.json")?)?;
//! let validator = CatalogValidator::new().with_known_patient_types(["1", "2", "3", "4"]);
//! ```

pub mod document;
pub mod rules;

pub use document::{catalog_schema, import_document, import_str, validate_document};
pub use rules::{duplicate_ids, CatalogValidator, CustomRuleFn};
