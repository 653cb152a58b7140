//! Semantic condition rules.
//!
//! `CatalogValidator` implements the `ConditionValidator` trait from
//! prism-core. Every rule runs and all failures are collected, so one report
//! names everything wrong with a condition.
//!
//! Built-in rules:
//!
//! | rule id | check |
//! |---|---|
//! | `id-non-empty` | the id is not blank |
//! | `name-non-empty` | the display name is not blank |
//! | `phases-non-empty` | at least one phase is defined |
//! | `phases-unique` | no phase label repeats |
//! | `phase-keys-known` | every phase key in the recommendation data is a defined phase |
//!
//! Unknown patient-type keys in a configured table are only logged, because a
//! patient type may be added to the catalog after the table was curated.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, warn};

use prism_contracts::{
    catalog::ALL,
    condition::{Condition, ConditionId, Recommendations},
    validation::{ValidationFailure, ValidationReport},
};
use prism_core::traits::ConditionValidator;

/// A caller-supplied condition check.
///
/// Returns `Some(message)` when the check fails, or `None` on success.
pub type CustomRuleFn = Box<dyn Fn(&Condition) -> Option<String> + Send + Sync>;

/// The standard `ConditionValidator`.
pub struct CatalogValidator {
    known_patient_types: Option<BTreeSet<String>>,
    custom_rules: BTreeMap<String, CustomRuleFn>,
}

impl CatalogValidator {
    /// A validator running only the built-in rules.
    pub fn new() -> Self {
        Self {
            known_patient_types: None,
            custom_rules: BTreeMap::new(),
        }
    }

    /// Warn about configured patient-type keys outside `names`.
    pub fn with_known_patient_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_patient_types = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Register an additional rule under `rule_id`. Registering the same id
    /// twice replaces the previous rule.
    pub fn register_rule(&mut self, rule_id: impl Into<String>, rule: CustomRuleFn) {
        self.custom_rules.insert(rule_id.into(), rule);
    }

    fn warn_unknown_patient_types(&self, condition: &Condition) {
        let (Some(known), Recommendations::Configured { patient_specific_config }) =
            (&self.known_patient_types, &condition.recommendations)
        else {
            return;
        };

        for (phase, by_type) in patient_specific_config {
            for key in by_type.keys() {
                if key != ALL && !known.contains(key) {
                    warn!(
                        condition_id = %condition.id,
                        phase = %phase,
                        patient_type = %key,
                        "recommendation table names an unknown patient type"
                    );
                }
            }
        }
    }
}

impl Default for CatalogValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionValidator for CatalogValidator {
    fn validate(&self, condition: &Condition) -> ValidationReport {
        let mut failures = Vec::new();

        if condition.id.as_str().trim().is_empty() {
            failures.push(ValidationFailure::new("id-non-empty", "condition id is blank"));
        }

        if condition.name.trim().is_empty() {
            failures.push(ValidationFailure::new(
                "name-non-empty",
                format!("condition '{}' has a blank name", condition.id),
            ));
        }

        if condition.phases.is_empty() {
            failures.push(ValidationFailure::new(
                "phases-non-empty",
                format!("condition '{}' defines no phases", condition.id),
            ));
        }

        let mut seen = HashSet::new();
        for phase in &condition.phases {
            if !seen.insert(phase.as_str()) {
                failures.push(ValidationFailure::new(
                    "phases-unique",
                    format!("condition '{}' repeats phase '{}'", condition.id, phase),
                ));
            }
        }

        for key in condition.recommendations.phase_keys() {
            if !condition.has_phase(key) {
                failures.push(ValidationFailure::new(
                    "phase-keys-known",
                    format!(
                        "condition '{}' has recommendations for undefined phase '{}'",
                        condition.id, key
                    ),
                ));
            }
        }

        self.warn_unknown_patient_types(condition);

        for (rule_id, rule) in &self.custom_rules {
            if let Some(message) = rule(condition) {
                failures.push(ValidationFailure::new(rule_id.clone(), message));
            }
        }

        for failure in &failures {
            warn!(
                condition_id = %condition.id,
                rule_id = %failure.rule_id,
                message = %failure.message,
                "condition rule failed"
            );
        }

        let report = ValidationReport::from_failures(failures);
        debug!(
            condition_id = %condition.id,
            passed = report.passed,
            failure_count = report.failures.len(),
            "condition validated"
        );
        report
    }
}

/// Ids that occur more than once in `conditions`, in first-repeat order.
pub fn duplicate_ids(conditions: &[Condition]) -> Vec<ConditionId> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for condition in conditions {
        if !seen.insert(&condition.id) && !duplicates.contains(&condition.id) {
            duplicates.push(condition.id.clone());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn condition(value: serde_json::Value) -> Condition {
        serde_json::from_value(value).unwrap()
    }

    fn rule_ids(report: &ValidationReport) -> Vec<&str> {
        report.failures.iter().map(|f| f.rule_id.as_str()).collect()
    }

    #[test]
    fn well_formed_condition_passes() {
        let report = CatalogValidator::new().validate(&condition(json!({
            "id": "c-dry",
            "name": "Dry Mouth",
            "phases": ["Mild", "Severe"],
            "patientSpecificConfig": { "Mild": { "All": ["Moisyn"] } }
        })));

        assert!(report.passed, "expected pass, failures: {:?}", report.failures);
    }

    #[test]
    fn phaseless_condition_fails() {
        let report = CatalogValidator::new().validate(&condition(json!({
            "id": "c-empty",
            "name": "Empty"
        })));

        assert!(!report.passed);
        assert_eq!(rule_ids(&report), vec!["phases-non-empty"]);
    }

    #[test]
    fn every_failure_is_reported() {
        let report = CatalogValidator::new().validate(&condition(json!({
            "id": " ",
            "name": "",
            "phases": ["Acute", "Acute"],
            "products": { "Chronic": ["Varnish"] }
        })));

        assert_eq!(
            rule_ids(&report),
            vec!["id-non-empty", "name-non-empty", "phases-unique", "phase-keys-known"]
        );
    }

    #[test]
    fn configured_phase_keys_must_be_phases() {
        let report = CatalogValidator::new().validate(&condition(json!({
            "id": "c-perio",
            "name": "Periodontitis",
            "phases": ["Active"],
            "patientSpecificConfig": { "Maintenance": { "All": ["X"] } }
        })));

        assert_eq!(rule_ids(&report), vec!["phase-keys-known"]);
        assert!(report.failures[0].message.contains("Maintenance"));
    }

    #[test]
    fn unknown_patient_type_keys_only_warn() {
        let validator = CatalogValidator::new().with_known_patient_types(["1", "2"]);
        let report = validator.validate(&condition(json!({
            "id": "c-perio",
            "name": "Periodontitis",
            "phases": ["Active"],
            "patientSpecificConfig": { "Active": { "All": ["X"], "7": ["Y"] } }
        })));

        assert!(report.passed, "expected pass, failures: {:?}", report.failures);
    }

    #[test]
    fn custom_rule_failure_carries_its_id() {
        let mut validator = CatalogValidator::new();
        validator.register_rule(
            "category-required",
            Box::new(|c| c.category.is_empty().then(|| "category is blank".to_string())),
        );

        let report = validator.validate(&condition(json!({
            "id": "c-1",
            "name": "Sensitivity",
            "phases": ["Acute"]
        })));

        assert!(!report.passed);
        assert_eq!(rule_ids(&report), vec!["category-required"]);
    }

    #[test]
    fn duplicate_ids_are_listed_once() {
        let a = condition(json!({ "id": "c-1", "name": "A", "phases": ["P"] }));
        let b = condition(json!({ "id": "c-2", "name": "B", "phases": ["P"] }));

        let duplicates = duplicate_ids(&[a.clone(), b, a.clone(), a]);
        assert_eq!(duplicates, vec![ConditionId::new("c-1")]);
    }
}
