//! # prism-contracts
//!
//! Catalog model, settings, and error types for the Prism clinical reference
//! engine.
//!
//! Every crate in the workspace imports from here. No engine logic lives in
//! this crate, only data definitions and their small accessors.

pub mod catalog;
pub mod condition;
pub mod error;
pub mod settings;
pub mod validation;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use catalog::{describe_patient_types, Dataset};
    use condition::{Condition, Recommendations, Usage};
    use error::PrismError;
    use settings::ResolutionSettings;

    // ── Condition deserialization ────────────────────────────────────────────

    #[test]
    fn configured_condition_deserializes_to_configured_variant() {
        let condition: Condition = serde_json::from_value(json!({
            "id": "c-dry-mouth",
            "name": "Dry Mouth",
            "category": "Oral Medicine",
            "specialtyTags": ["General Dentist"],
            "patientTypeNames": ["1", "2"],
            "phases": ["Mild", "Severe"],
            "patientSpecificConfig": {
                "Mild": { "All": ["Moisyn"], "1": ["Rinse"] }
            }
        }))
        .unwrap();

        match &condition.recommendations {
            Recommendations::Configured { patient_specific_config } => {
                assert_eq!(patient_specific_config["Mild"]["All"], vec!["Moisyn"]);
            }
            other => panic!("expected Configured, got {:?}", other),
        }
        assert!(condition.specialty_tags.contains("General Dentist"));
        assert_eq!(condition.first_phase(), Some("Mild"));
    }

    #[test]
    fn condition_without_table_deserializes_to_legacy_variant() {
        let condition: Condition = serde_json::from_value(json!({
            "id": "c-gingivitis",
            "name": "Gingivitis",
            "phases": ["Active"],
            "products": { "Active": ["Rinse", "Gel (Type 3/4 Only)"] }
        }))
        .unwrap();

        match &condition.recommendations {
            Recommendations::Legacy { products_by_phase } => {
                assert_eq!(products_by_phase["Active"].len(), 2);
            }
            other => panic!("expected Legacy, got {:?}", other),
        }
        assert!(!condition.recommendations.is_configured());
    }

    #[test]
    fn null_table_falls_back_to_legacy_variant() {
        let condition: Condition = serde_json::from_value(json!({
            "id": "c-1",
            "name": "Sensitivity",
            "phases": ["Acute"],
            "patientSpecificConfig": null,
            "products": { "Acute": ["Varnish"] }
        }))
        .unwrap();

        assert!(matches!(condition.recommendations, Recommendations::Legacy { .. }));
    }

    #[test]
    fn condition_serde_round_trips() {
        let original: Condition = serde_json::from_value(json!({
            "id": "c-2",
            "name": "Implant Placement",
            "phases": ["Pre-op", "Post-op"],
            "patientSpecificConfig": { "Post-op": { "All": ["Rinse"] } },
            "productDetails": {
                "Rinse": { "usage": { "Post-op": "Twice daily" } }
            }
        }))
        .unwrap();

        let json = serde_json::to_string(&original).unwrap();
        let decoded: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn product_detail_accepts_exported_field_names() {
        let detail: condition::ProductDetail = serde_json::from_value(json!({
            "objection": "Cost is offset by fewer recalls.",
            "factSheet": "https://example.test/gel.pdf"
        }))
        .unwrap();

        assert_eq!(detail.handling_objections, "Cost is offset by fewer recalls.");
        assert_eq!(detail.fact_sheet_url, "https://example.test/gel.pdf");

        let written = serde_json::to_value(&detail).unwrap();
        assert_eq!(written["handlingObjections"], "Cost is offset by fewer recalls.");
        assert_eq!(written["factSheetUrl"], "https://example.test/gel.pdf");
    }

    // ── Usage ────────────────────────────────────────────────────────────────

    #[test]
    fn usage_prefers_phase_entry_and_treats_text_as_universal() {
        let by_phase: Usage = serde_json::from_value(json!({ "Mild": "Once daily" })).unwrap();
        assert_eq!(by_phase.for_phase("Mild"), Some("Once daily"));
        assert_eq!(by_phase.for_phase("Severe"), None);

        let text = Usage::Text("Apply at night".to_string());
        assert_eq!(text.for_phase("anything"), Some("Apply at night"));
        assert_eq!(Usage::default().for_phase("anything"), None);
    }

    // ── ResolutionSettings ───────────────────────────────────────────────────

    #[test]
    fn marker_is_stripped_from_restricted_identifiers() {
        let settings = ResolutionSettings::default();
        assert!(settings.is_restricted("Gel (Type 3/4 Only)"));
        assert_eq!(settings.bare_product_id("Gel (Type 3/4 Only)"), "Gel");
        assert!(!settings.is_restricted("Gel"));
        assert_eq!(settings.bare_product_id("Gel"), "Gel");
    }

    #[test]
    fn default_settings_disable_legacy_inference() {
        assert!(!ResolutionSettings::default().legacy_inference);
        assert!(ResolutionSettings::with_legacy_inference().legacy_inference);
    }

    // ── Patient-type label ───────────────────────────────────────────────────

    #[test]
    fn full_patient_type_range_collapses() {
        let names: Vec<String> = ["3", "1", "4", "2"].map(String::from).to_vec();
        assert_eq!(describe_patient_types(&names), "Types 1 to 4");
    }

    #[test]
    fn partial_patient_type_range_is_listed_in_order() {
        let names: Vec<String> = ["Type 3", "Type 1"].map(String::from).to_vec();
        assert_eq!(describe_patient_types(&names), "Type 1, Type 3");
        assert_eq!(describe_patient_types(&[]), "N/A");
    }

    // ── PrismError display messages ──────────────────────────────────────────

    #[test]
    fn error_load_failed_display() {
        let err = PrismError::LoadFailed {
            dataset: Dataset::PatientTypes,
            reason: "connection reset".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("patient types"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn error_invalid_phase_display() {
        let err = PrismError::InvalidPhase {
            phase: "Chronic".to_string(),
            condition: "c-1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Chronic"));
        assert!(msg.contains("c-1"));
    }

    #[test]
    fn error_config_error_display() {
        let err = PrismError::ConfigError {
            reason: "ttl must be an integer".to_string(),
        };
        assert!(err.to_string().contains("configuration error"));
    }

    #[test]
    fn error_render_display_is_not_a_configuration_error() {
        let err = PrismError::Render {
            reason: "key must be a string".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to render output"));
        assert!(msg.contains("key must be a string"));
        assert!(!msg.contains("configuration"));
    }
}
