//! Patient-type and product records, and the catalog document envelope.
//!
//! These are owned by the external data-access layer. The engine reads them
//! as immutable snapshots and joins on `name`, never on the numeric id.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;

/// The identity value of every filter criterion and the universal
/// patient-type view.
pub const ALL: &str = "All";

/// A named patient modifier (e.g. a risk category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientType {
    /// Storage ordinal. Not used as a join key.
    pub id: i64,
    /// Unique name, matched against `Condition::patient_type_names` and the
    /// patient-type keys of a configured recommendation table.
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// An entry in the product-availability catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Join key; matches bare product identifiers used in conditions.
    pub name: String,
    pub is_available: bool,
}

/// One of the three datasets fetched on every catalog reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dataset {
    Conditions,
    Products,
    PatientTypes,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dataset::Conditions => "conditions",
            Dataset::Products => "products",
            Dataset::PatientTypes => "patient types",
        };
        f.write_str(name)
    }
}

/// A full catalog as exchanged in JSON import/export documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub patient_types: Vec<PatientType>,
}

/// Render the patient types a condition applies to as a short label.
///
/// Exactly types 1 through 4 collapse to `"Types 1 to 4"`; anything else is
/// listed in numeric order. Names may be bare numbers or `"Type N"`.
pub fn describe_patient_types(names: &[String]) -> String {
    if names.is_empty() {
        return "N/A".to_string();
    }

    let mut numbered: Vec<(u32, &str)> = names
        .iter()
        .map(|name| (patient_type_number(name).unwrap_or(0), name.as_str()))
        .collect();
    numbered.sort_by_key(|(number, _)| *number);

    let numbers: Vec<u32> = numbered.iter().map(|(n, _)| *n).collect();
    if numbers == [1, 2, 3, 4] {
        return "Types 1 to 4".to_string();
    }

    numbered
        .iter()
        .map(|(number, name)| match number {
            0 => name.to_string(),
            n => format!("Type {n}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn patient_type_number(name: &str) -> Option<u32> {
    name.trim().trim_start_matches("Type ").parse().ok()
}
