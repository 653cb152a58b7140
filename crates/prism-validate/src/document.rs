//! Structural validation and import of JSON catalog documents.
//!
//! A document is checked against `catalog_schema()` with the `jsonschema`
//! crate before it is deserialized, so malformed input is reported with
//! instance paths rather than a single serde error.

use serde_json::{json, Value};
use tracing::{debug, warn};

use prism_contracts::{
    catalog::CatalogDocument,
    error::{PrismError, PrismResult},
    validation::{ValidationFailure, ValidationReport},
};

use crate::rules::duplicate_ids;

fn string_list() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn condition_schema() -> Value {
    json!({
        "type": "object",
        "required": ["id", "name"],
        "properties": {
            "id": { "type": "string", "minLength": 1 },
            "name": { "type": "string" },
            "category": { "type": "string" },
            "specialtyTags": string_list(),
            "patientTypeNames": string_list(),
            "phases": string_list(),
            "patientSpecificConfig": {
                "type": ["object", "null"],
                "additionalProperties": {
                    "type": "object",
                    "additionalProperties": string_list()
                }
            },
            "products": {
                "type": "object",
                "additionalProperties": string_list()
            },
            "productDetails": { "type": "object" },
            "conditionSpecificResearch": {
                "type": "object",
                "additionalProperties": { "type": "array" }
            }
        }
    })
}

/// JSON Schema for a catalog document.
pub fn catalog_schema() -> Value {
    json!({
        "type": "object",
        "required": ["conditions"],
        "properties": {
            "conditions": { "type": "array", "items": condition_schema() },
            "products": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name", "isAvailable"],
                    "properties": {
                        "name": { "type": "string" },
                        "isAvailable": { "type": "boolean" }
                    }
                }
            },
            "patientTypes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": { "type": "integer" },
                        "name": { "type": "string" },
                        "description": { "type": "string" }
                    }
                }
            }
        }
    })
}

/// Check `document` against `catalog_schema()`, collecting every violation.
pub fn validate_document(document: &Value) -> ValidationReport {
    let schema = catalog_schema();
    let failures = match jsonschema::validator_for(&schema) {
        Ok(validator) => validator
            .iter_errors(document)
            .map(|error| {
                let message = format!(
                    "JSON Schema violation at {}: {}",
                    error.instance_path, error
                );
                warn!(%message, "catalog document failed structural validation");
                ValidationFailure::new("json-schema", message)
            })
            .collect(),
        Err(e) => {
            let message = format!("invalid JSON Schema document: {e}");
            warn!(%message, "schema compilation failure");
            vec![ValidationFailure::new("json-schema", message)]
        }
    };

    ValidationReport::from_failures(failures)
}

/// Validate `document` and deserialize it into a `CatalogDocument`.
///
/// Returns `PrismError::SchemaValidation` listing every violation when the
/// document does not match the schema.
pub fn import_document(document: &Value) -> PrismResult<CatalogDocument> {
    let report = validate_document(document);
    if !report.passed {
        return Err(PrismError::SchemaValidation {
            reason: report.summary(),
        });
    }

    let catalog: CatalogDocument =
        serde_json::from_value(document.clone()).map_err(|e| PrismError::SchemaValidation {
            reason: format!("catalog document does not match the catalog model: {e}"),
        })?;

    for id in duplicate_ids(&catalog.conditions) {
        warn!(condition_id = %id, "catalog document repeats a condition id; first entry wins");
    }

    debug!(
        conditions = catalog.conditions.len(),
        products = catalog.products.len(),
        patient_types = catalog.patient_types.len(),
        "catalog document imported"
    );
    Ok(catalog)
}

/// Parse `text` as JSON and import it.
pub fn import_str(text: &str) -> PrismResult<CatalogDocument> {
    let document: Value = serde_json::from_str(text).map_err(|e| PrismError::SchemaValidation {
        reason: format!("catalog document is not valid JSON: {e}"),
    })?;
    import_document(&document)
}

#[cfg(test)]
mod tests {
    use prism_contracts::condition::Recommendations;

    use super::*;

    fn document() -> Value {
        json!({
            "conditions": [
                {
                    "id": "c-dry",
                    "name": "Dry Mouth",
                    "category": "Oral Medicine",
                    "phases": ["Mild"],
                    "patientSpecificConfig": { "Mild": { "All": ["Moisyn"] } }
                },
                {
                    "id": "c-ging",
                    "name": "Gingivitis",
                    "phases": ["Active"],
                    "products": { "Active": ["Rinse (Type 3/4 Only)"] }
                }
            ],
            "products": [ { "name": "Moisyn", "isAvailable": true } ],
            "patientTypes": [ { "id": 1, "name": "1" } ]
        })
    }

    #[test]
    fn valid_document_imports_both_shapes() {
        let catalog = import_document(&document()).unwrap();

        assert_eq!(catalog.conditions.len(), 2);
        assert!(catalog.conditions[0].recommendations.is_configured());
        assert!(matches!(
            catalog.conditions[1].recommendations,
            Recommendations::Legacy { .. }
        ));
        assert_eq!(catalog.products.len(), 1);
        assert_eq!(catalog.patient_types[0].name, "1");
    }

    #[test]
    fn optional_sections_may_be_omitted() {
        let catalog = import_document(&json!({ "conditions": [] })).unwrap();
        assert!(catalog.products.is_empty());
        assert!(catalog.patient_types.is_empty());
    }

    #[test]
    fn missing_conditions_fails_schema() {
        let report = validate_document(&json!({ "products": [] }));
        assert!(!report.passed);
        assert_eq!(report.failures[0].rule_id, "json-schema");
    }

    #[test]
    fn every_violation_is_reported() {
        let mut doc = document();
        doc["conditions"][0]["phases"] = json!("Mild");
        doc["products"][0]["isAvailable"] = json!("yes");

        let report = validate_document(&doc);
        assert_eq!(report.failures.len(), 2, "failures: {:?}", report.failures);
    }

    #[test]
    fn import_rejects_malformed_table() {
        let mut doc = document();
        doc["conditions"][0]["patientSpecificConfig"] = json!({ "Mild": { "All": "Moisyn" } });

        match import_document(&doc) {
            Err(PrismError::SchemaValidation { reason }) => {
                assert!(reason.contains("json-schema"), "unexpected reason: {reason}");
            }
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
    }

    #[test]
    fn import_str_rejects_invalid_json() {
        assert!(matches!(
            import_str("{ not json"),
            Err(PrismError::SchemaValidation { .. })
        ));
    }
}
