//! Resolution settings shared by the resolver and the availability annotator.

use serde::{Deserialize, Serialize};

/// Knobs controlling how recommendation lists are resolved.
///
/// `Default` gives the configured-only behaviour: legacy catalog entries
/// resolve to empty lists until `legacy_inference` is switched on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSettings {
    /// Infer per-patient-type tables for conditions that only carry legacy
    /// per-phase product listings.
    pub legacy_inference: bool,
    /// Marker appended to a legacy product identifier to restrict it to
    /// `restricted_patient_types`.
    pub restricted_marker: String,
    /// Patient-type keys populated during legacy inference.
    pub legacy_patient_types: Vec<String>,
    /// Patient-type keys that receive restricted legacy products.
    pub restricted_patient_types: Vec<String>,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            legacy_inference: false,
            restricted_marker: "(Type 3/4 Only)".to_string(),
            legacy_patient_types: ["1", "2", "3", "4"].map(String::from).to_vec(),
            restricted_patient_types: ["3", "4"].map(String::from).to_vec(),
        }
    }
}

impl ResolutionSettings {
    /// Settings with legacy inference enabled and everything else default.
    pub fn with_legacy_inference() -> Self {
        Self {
            legacy_inference: true,
            ..Self::default()
        }
    }

    /// True if `product_id` carries the restriction marker.
    pub fn is_restricted(&self, product_id: &str) -> bool {
        !self.restricted_marker.is_empty()
            && product_id.trim_end().ends_with(self.restricted_marker.as_str())
    }

    /// Strip the restriction marker, yielding the joinable product name.
    pub fn bare_product_id<'a>(&self, product_id: &'a str) -> &'a str {
        if self.restricted_marker.is_empty() {
            return product_id;
        }
        match product_id.trim_end().strip_suffix(self.restricted_marker.as_str()) {
            Some(bare) => bare.trim_end(),
            None => product_id,
        }
    }
}
