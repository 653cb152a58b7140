//! Scenario 3: Legacy Catalog Entries
//!
//! Gingivitis predates the curated patient-specific table and only lists
//! products per phase, some marked "(Type 3/4 Only)".
//!   1. With default settings, legacy entries resolve to nothing
//!   2. With `[resolution] legacy_inference = true`, a table is inferred:
//!      "All" shows every listed product, unmarked products go to every
//!      patient type, and marked products go (stripped) to types 3 and 4

use std::sync::Arc;

use prism_config::Settings;
use prism_contracts::{condition::ConditionId, error::PrismResult};
use prism_core::Browser;
use prism_validate::CatalogValidator;

use crate::{mock_data::reference_catalog, sources::MockCatalogSource};

use super::print_recommendations;

const LEGACY_SETTINGS: &str = r#"
[resolution]
legacy_inference = true

[cache]
ttl_seconds = 0
"#;

fn walk_gingivitis(settings: &Settings) -> PrismResult<()> {
    let source = Arc::new(MockCatalogSource::new(reference_catalog()?));
    let mut browser = Browser::new(
        source,
        Box::new(CatalogValidator::new()),
        settings.resolution.clone(),
    );
    browser.reload(false);
    browser.select_condition(&ConditionId::new("c-gingivitis"));

    for view in ["All", "1", "3"] {
        browser.select_patient_type_view(view);
        print_recommendations(&browser);
    }
    Ok(())
}

/// Run Scenario 3: Legacy Catalog Entries.
pub fn run_scenario() -> PrismResult<()> {
    println!("=== Scenario 3: Legacy Catalog Entries ===");
    println!();

    println!("  Default settings (legacy inference off):");
    walk_gingivitis(&Settings::default())?;
    println!();

    println!("  Settings with legacy inference on:");
    walk_gingivitis(&Settings::from_toml_str(LEGACY_SETTINGS)?)?;
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
