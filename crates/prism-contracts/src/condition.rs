//! The condition entity and its recommendation data.
//!
//! A condition carries its recommendations in one of two shapes. Newer
//! catalog entries hold an explicit per-phase, per-patient-type table
//! (`Recommendations::Configured`). Older entries only list products per
//! phase, some of them tagged with a restriction marker
//! (`Recommendations::Legacy`); the resolver can infer a table from those
//! when legacy inference is enabled.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// phase label → patient-type name (or `"All"`) → ordered product identifiers.
pub type PatientSpecificConfig = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// phase label → ordered product identifiers, possibly carrying a
/// restriction marker.
pub type LegacyProducts = BTreeMap<String, Vec<String>>;

/// Stable identity of a condition across reloads.
///
/// The display name is user-editable and therefore never used for identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(pub String);

impl ConditionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A clinical condition or procedure in the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: ConditionId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Practitioner specialty classifiers.
    #[serde(default)]
    pub specialty_tags: BTreeSet<String>,
    /// Patient types this condition applies to, in display order.
    #[serde(default)]
    pub patient_type_names: Vec<String>,
    /// Ordered treatment phases. Must be non-empty; the validation boundary
    /// rejects conditions without phases.
    #[serde(default)]
    pub phases: Vec<String>,
    #[serde(flatten)]
    pub recommendations: Recommendations,
    /// Keyed by bare product identifier.
    #[serde(default)]
    pub product_details: BTreeMap<String, ProductDetail>,
    /// Research curated for a product within this condition specifically.
    /// Takes precedence over `ProductDetail::research_articles`.
    #[serde(default)]
    pub condition_specific_research: BTreeMap<String, Vec<ResearchArticle>>,
}

impl Condition {
    /// The phase selected by default when this condition becomes active.
    pub fn first_phase(&self) -> Option<&str> {
        self.phases.first().map(String::as_str)
    }

    pub fn has_phase(&self, phase: &str) -> bool {
        self.phases.iter().any(|p| p == phase)
    }
}

/// The two recommendation data shapes found in the catalog.
///
/// Deserialization picks `Configured` whenever a `patientSpecificConfig`
/// table is present, and falls back to the legacy `products` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recommendations {
    /// Explicitly curated products per phase and patient type.
    Configured {
        #[serde(rename = "patientSpecificConfig")]
        patient_specific_config: PatientSpecificConfig,
    },
    /// Flat per-phase listing predating the curated table.
    Legacy {
        #[serde(rename = "products", default)]
        products_by_phase: LegacyProducts,
    },
}

impl Default for Recommendations {
    fn default() -> Self {
        Recommendations::Legacy {
            products_by_phase: LegacyProducts::new(),
        }
    }
}

impl Recommendations {
    pub fn is_configured(&self) -> bool {
        matches!(self, Recommendations::Configured { .. })
    }

    /// Phase labels referenced by the recommendation data.
    pub fn phase_keys(&self) -> Vec<&str> {
        match self {
            Recommendations::Configured { patient_specific_config } => {
                patient_specific_config.keys().map(String::as_str).collect()
            }
            Recommendations::Legacy { products_by_phase } => {
                products_by_phase.keys().map(String::as_str).collect()
            }
        }
    }
}

/// Descriptive material shown alongside a recommended product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub scientific_rationale: String,
    #[serde(default)]
    pub competitive: String,
    /// Also accepted as `objection`, the name used by exported records.
    #[serde(default, alias = "objection")]
    pub handling_objections: String,
    #[serde(default)]
    pub clinical_evidence: String,
    #[serde(default)]
    pub pitch_points: String,
    #[serde(default, alias = "factSheet")]
    pub fact_sheet_url: String,
    #[serde(default)]
    pub research_articles: Vec<ResearchArticle>,
}

/// Usage instructions: a single text or one entry per phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Usage {
    Text(String),
    ByPhase(BTreeMap<String, String>),
}

impl Default for Usage {
    fn default() -> Self {
        Usage::Text(String::new())
    }
}

impl Usage {
    /// Instructions for `phase`, if any exist.
    ///
    /// Plain-text usage applies to every phase.
    pub fn for_phase(&self, phase: &str) -> Option<&str> {
        match self {
            Usage::Text(text) if text.is_empty() => None,
            Usage::Text(text) => Some(text),
            Usage::ByPhase(by_phase) => by_phase.get(phase).map(String::as_str),
        }
    }
}

/// A research citation attached to a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchArticle {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "abstract")]
    pub summary: String,
}
