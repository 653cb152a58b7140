//! The recommendation resolver.
//!
//! Turns a (condition, phase, patient-type view) triple into a deduplicated
//! list of product identifiers. Two strategies exist, chosen by the
//! condition's `Recommendations` variant:
//!
//! - **Configured**: look the pair up in the curated table. The `"All"` view
//!   returns only products curated for `"All"`; per-type products never leak
//!   into it.
//! - **Legacy inference** (behind `ResolutionSettings::legacy_inference`):
//!   build a table from the per-phase listing, where every product is shown
//!   under `"All"`, unmarked products go to every legacy patient type, and
//!   marked products go, stripped, to the restricted types only.
//!
//! Missing phases, missing keys, and disabled inference all resolve to an
//! empty list. The resolver never fails.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use prism_contracts::{
    catalog::ALL,
    condition::{Condition, ConditionId, LegacyProducts, PatientSpecificConfig, Recommendations},
    settings::ResolutionSettings,
};

/// Where a plan's table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanSource {
    Configured,
    Inferred,
    /// Legacy data with inference switched off; resolves to nothing.
    LegacyDisabled,
}

/// The per-phase, per-patient-type table for one condition.
///
/// Built once when a condition becomes active and reused for every phase or
/// view change until the selection moves to another condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationPlan {
    pub condition_id: ConditionId,
    pub source: PlanSource,
    table: PatientSpecificConfig,
}

impl RecommendationPlan {
    pub fn for_condition(condition: &Condition, settings: &ResolutionSettings) -> Self {
        let (source, table) = match &condition.recommendations {
            Recommendations::Configured { patient_specific_config } => {
                (PlanSource::Configured, patient_specific_config.clone())
            }
            Recommendations::Legacy { products_by_phase } if settings.legacy_inference => (
                PlanSource::Inferred,
                infer_legacy_table(&condition.phases, products_by_phase, settings),
            ),
            Recommendations::Legacy { .. } => {
                (PlanSource::LegacyDisabled, PatientSpecificConfig::new())
            }
        };

        debug!(
            condition_id = %condition.id,
            source = ?source,
            phases = table.len(),
            "built recommendation plan"
        );

        Self {
            condition_id: condition.id.clone(),
            source,
            table,
        }
    }

    /// Products for `phase` under `patient_type_view`, first occurrence kept.
    pub fn resolve(&self, phase: &str, patient_type_view: &str) -> Vec<String> {
        self.table
            .get(phase)
            .and_then(|by_type| by_type.get(patient_type_view))
            .map(|products| dedup(products))
            .unwrap_or_default()
    }
}

/// Resolve recommendations for one condition in a single call.
pub fn resolve(
    condition: &Condition,
    phase: &str,
    patient_type_view: &str,
    settings: &ResolutionSettings,
) -> Vec<String> {
    RecommendationPlan::for_condition(condition, settings).resolve(phase, patient_type_view)
}

/// Infer a patient-specific table from a legacy per-phase listing.
pub fn infer_legacy_table(
    phases: &[String],
    products_by_phase: &LegacyProducts,
    settings: &ResolutionSettings,
) -> PatientSpecificConfig {
    let mut table = PatientSpecificConfig::new();

    for phase in phases {
        let listed = products_by_phase.get(phase).cloned().unwrap_or_default();

        let mut by_type: BTreeMap<String, Vec<String>> = settings
            .legacy_patient_types
            .iter()
            .map(|t| (t.clone(), Vec::new()))
            .collect();

        for product in &listed {
            if settings.is_restricted(product) {
                let bare = settings.bare_product_id(product);
                for patient_type in &settings.restricted_patient_types {
                    by_type.entry(patient_type.clone()).or_default().push(bare.to_string());
                }
            } else {
                for products in by_type.values_mut() {
                    products.push(product.clone());
                }
            }
        }

        by_type.insert(ALL.to_string(), listed);
        table.insert(phase.clone(), by_type);
    }

    table
}

fn dedup(products: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|p| seen.insert(p.as_str()))
        .cloned()
        .collect()
}
