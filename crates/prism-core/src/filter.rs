//! The filter engine: narrows the condition catalog by independent criteria.
//!
//! Every criterion set to `"All"` (or an empty search text) matches
//! everything. Active criteria combine with logical AND, and the result keeps
//! catalog order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use prism_contracts::{
    catalog::{PatientType, ALL},
    condition::Condition,
};

/// The four filter inputs chosen at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Exact match against `Condition::category`.
    pub category: String,
    /// Membership in `Condition::specialty_tags`.
    pub specialty_tag: String,
    /// Membership in `Condition::patient_type_names`.
    pub patient_type_name: String,
    /// Case-insensitive substring of `Condition::name`.
    pub search_text: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            category: ALL.to_string(),
            specialty_tag: ALL.to_string(),
            patient_type_name: ALL.to_string(),
            search_text: String::new(),
        }
    }
}

impl FilterCriteria {
    /// True if no criterion narrows the catalog.
    pub fn is_identity(&self) -> bool {
        self.category == ALL
            && self.specialty_tag == ALL
            && self.patient_type_name == ALL
            && self.search_text.is_empty()
    }

    /// Reset any category, specialty or patient-type criterion that is no
    /// longer offered by `options`. Returns the names of the reset criteria.
    pub fn reconcile(&mut self, options: &FilterOptions) -> Vec<&'static str> {
        let mut reset = Vec::new();
        if !options.categories.contains(&self.category) {
            self.category = ALL.to_string();
            reset.push("category");
        }
        if !options.specialty_tags.contains(&self.specialty_tag) {
            self.specialty_tag = ALL.to_string();
            reset.push("specialty_tag");
        }
        if !options.patient_types.contains(&self.patient_type_name) {
            self.patient_type_name = ALL.to_string();
            reset.push("patient_type_name");
        }
        reset
    }

    fn matches(&self, condition: &Condition, needle: Option<&str>) -> bool {
        if self.category != ALL && condition.category != self.category {
            return false;
        }
        if self.specialty_tag != ALL && !condition.specialty_tags.contains(&self.specialty_tag) {
            return false;
        }
        if self.patient_type_name != ALL
            && !condition.patient_type_names.contains(&self.patient_type_name)
        {
            return false;
        }
        match needle {
            Some(needle) => condition.name.to_lowercase().contains(needle),
            None => true,
        }
    }
}

/// Reduce `catalog` to the conditions matching every active criterion.
///
/// Pure and order-preserving. An identity criteria set returns the whole
/// catalog without evaluating any predicate.
pub fn filter<'c>(catalog: &'c [Condition], criteria: &FilterCriteria) -> Vec<&'c Condition> {
    if criteria.is_identity() {
        return catalog.iter().collect();
    }

    let needle = (!criteria.search_text.is_empty()).then(|| criteria.search_text.to_lowercase());
    let filtered: Vec<&Condition> = catalog
        .iter()
        .filter(|condition| criteria.matches(condition, needle.as_deref()))
        .collect();

    debug!(
        catalog = catalog.len(),
        matched = filtered.len(),
        category = %criteria.category,
        specialty_tag = %criteria.specialty_tag,
        patient_type = %criteria.patient_type_name,
        "filtered conditions"
    );
    filtered
}

/// The values offered for each selectable criterion, `"All"` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub specialty_tags: Vec<String>,
    pub patient_types: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            categories: vec![ALL.to_string()],
            specialty_tags: vec![ALL.to_string()],
            patient_types: vec![ALL.to_string()],
        }
    }
}

impl FilterOptions {
    /// Derive options from a catalog snapshot.
    ///
    /// Categories and specialty tags come from the conditions in first-seen
    /// order; patient types come from the patient-type catalog.
    pub fn from_catalog(conditions: &[Condition], patient_types: &[PatientType]) -> Self {
        let mut options = Self::default();
        for condition in conditions {
            push_option(&mut options.categories, &condition.category);
            for tag in &condition.specialty_tags {
                push_option(&mut options.specialty_tags, tag);
            }
        }
        for patient_type in patient_types {
            push_option(&mut options.patient_types, &patient_type.name);
        }
        options
    }
}

fn push_option(options: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !options.iter().any(|o| o == value) {
        options.push(value.to_string());
    }
}
