//! Simulated dental reference catalog.
//!
//! All data in this module is hardcoded and fictional. Product names do not
//! refer to real products. The catalog mixes both recommendation shapes:
//! three conditions carry a curated patient-specific table, and Gingivitis
//! still carries a legacy per-phase listing with restriction markers.

use serde_json::{json, Value};

use prism_contracts::{catalog::CatalogDocument, error::PrismResult};

// ── Patient types ─────────────────────────────────────────────────────────────

fn patient_types() -> Value {
    json!([
        { "id": 1, "name": "1", "description": "Low caries risk, healthy periodontium" },
        { "id": 2, "name": "2", "description": "Moderate risk, early gingival involvement" },
        { "id": 3, "name": "3", "description": "High risk, active periodontal disease" },
        { "id": 4, "name": "4", "description": "Extreme risk, medically compromised" }
    ])
}

// ── Product availability ──────────────────────────────────────────────────────

fn products() -> Value {
    json!([
        { "name": "Moisyn Rinse", "isAvailable": true },
        { "name": "Xylitol Lozenges", "isAvailable": true },
        { "name": "ProVantage Gel", "isAvailable": false },
        { "name": "Sodium Fluoride 1.1% Gel", "isAvailable": true },
        { "name": "Fluoride Varnish 5%", "isAvailable": true },
        { "name": "Chlorhexidine 0.12%", "isAvailable": true },
        { "name": "Arginine Paste", "isAvailable": false },
        { "name": "Implant Care Kit", "isAvailable": true }
    ])
}

// ── Conditions ────────────────────────────────────────────────────────────────

fn dry_mouth() -> Value {
    json!({
        "id": "c-xerostomia",
        "name": "Dry Mouth (Xerostomia)",
        "category": "Oral Medicine",
        "specialtyTags": ["General Dentist", "Hygienist"],
        "patientTypeNames": ["1", "2", "3", "4"],
        "phases": ["Mild", "Moderate", "Severe"],
        "patientSpecificConfig": {
            "Mild": {
                "All": ["Moisyn Rinse", "Xylitol Lozenges"],
                "3": ["Moisyn Rinse", "Sodium Fluoride 1.1% Gel"],
                "4": ["Sodium Fluoride 1.1% Gel", "ProVantage Gel"]
            },
            "Moderate": {
                "All": ["Moisyn Rinse"],
                "2": ["Xylitol Lozenges"],
                "3": ["ProVantage Gel"],
                "4": ["ProVantage Gel", "Chlorhexidine 0.12%"]
            },
            "Severe": {
                "All": ["Moisyn Rinse", "Sodium Fluoride 1.1% Gel"],
                "4": ["ProVantage Gel"]
            }
        },
        "productDetails": {
            "Moisyn Rinse": {
                "usage": {
                    "Mild": "Rinse with 10 mL as needed throughout the day.",
                    "Moderate": "Rinse with 10 mL four times daily and before sleep.",
                    "Severe": "Rinse with 15 mL every two hours while awake."
                },
                "scientificRationale": "Lubricates oral mucosa and buffers acids.",
                "pitchPoints": "Alcohol-free; safe for daily use."
            },
            "ProVantage Gel": {
                "usage": "Brush on for two minutes at bedtime; do not rinse.",
                "clinicalEvidence": "High-fluoride gel reduces root caries incidence.",
                "researchArticles": [
                    { "title": "High-fluoride gels in adults", "author": "Lindqvist", "url": "", "abstract": "" }
                ]
            }
        },
        "conditionSpecificResearch": {
            "ProVantage Gel": [
                {
                    "title": "Fluoride gel for radiation-induced xerostomia",
                    "author": "Okafor",
                    "url": "",
                    "abstract": "Nightly gel use reduced new lesions over 12 months."
                }
            ]
        }
    })
}

fn gingivitis() -> Value {
    json!({
        "id": "c-gingivitis",
        "name": "Gingivitis",
        "category": "Periodontics",
        "specialtyTags": ["Hygienist", "Periodontist"],
        "patientTypeNames": ["2", "3", "4"],
        "phases": ["Active", "Maintenance"],
        "products": {
            "Active": ["Chlorhexidine 0.12%", "ProVantage Gel (Type 3/4 Only)"],
            "Maintenance": ["Xylitol Lozenges", "Fluoride Varnish 5% (Type 3/4 Only)"]
        },
        "productDetails": {
            "Chlorhexidine 0.12%": {
                "usage": "Rinse with 15 mL for 30 seconds twice daily for two weeks."
            }
        }
    })
}

fn hypersensitivity() -> Value {
    json!({
        "id": "c-hypersensitivity",
        "name": "Dentin Hypersensitivity",
        "category": "Restorative",
        "specialtyTags": ["General Dentist"],
        "patientTypeNames": ["1", "2"],
        "phases": ["Acute", "Ongoing"],
        "patientSpecificConfig": {
            "Acute": { "All": ["Arginine Paste", "Fluoride Varnish 5%"] },
            "Ongoing": { "All": ["Arginine Paste"] }
        }
    })
}

fn implant_placement() -> Value {
    json!({
        "id": "c-implant",
        "name": "Implant Placement",
        "category": "Surgery",
        "specialtyTags": ["Oral Surgeon", "Periodontist"],
        "patientTypeNames": ["3", "4"],
        "phases": ["Pre-Op", "Post-Op"],
        "patientSpecificConfig": {
            "Pre-Op": { "All": ["Chlorhexidine 0.12%"] },
            "Post-Op": {
                "All": ["Implant Care Kit"],
                "4": ["Implant Care Kit", "Chlorhexidine 0.12%"]
            }
        }
    })
}

// ── Catalog document ──────────────────────────────────────────────────────────

/// The full reference catalog as a JSON document.
pub fn catalog_document() -> Value {
    json!({
        "conditions": [dry_mouth(), gingivitis(), hypersensitivity(), implant_placement()],
        "products": products(),
        "patientTypes": patient_types()
    })
}

/// The reference catalog, schema-checked and deserialized.
pub fn reference_catalog() -> PrismResult<CatalogDocument> {
    prism_validate::import_document(&catalog_document())
}
