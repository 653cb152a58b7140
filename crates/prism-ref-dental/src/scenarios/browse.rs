//! Scenario 1: Browse and Resolve
//!
//! Walks a clinician through the catalog:
//!   1. Reload the catalog (three datasets fetched concurrently)
//!   2. Narrow the list with a specialty filter and a search term
//!   3. Select Dry Mouth and step through its phases
//!   4. Switch patient-type views; "All" shows only universal products
//!   5. Ask for an undefined phase; the selection is left unchanged

use std::sync::Arc;

use prism_contracts::{
    catalog::ALL, condition::ConditionId, error::PrismResult, settings::ResolutionSettings,
};
use prism_core::{cache::CachedSource, traits::CatalogSource, Browser};
use prism_validate::CatalogValidator;

use crate::{mock_data::reference_catalog, sources::MockCatalogSource};

use super::{print_conditions, print_recommendations};

/// Run Scenario 1: Browse and Resolve.
pub fn run_scenario() -> PrismResult<()> {
    println!("=== Scenario 1: Browse and Resolve ===");
    println!();

    // ── Wire up the session ───────────────────────────────────────────────────

    let source: Arc<dyn CatalogSource> = Arc::new(CachedSource::with_default_ttl(
        MockCatalogSource::new(reference_catalog()?),
    ));
    let validator = CatalogValidator::new().with_known_patient_types(["1", "2", "3", "4"]);
    let mut browser = Browser::new(source, Box::new(validator), ResolutionSettings::default());

    browser.reload(false);
    let options = browser.filter_options();
    println!("  Catalog status:  {:?}", browser.status());
    println!("  Categories:      {}", options.categories.join(", "));
    println!("  Specialties:     {}", options.specialty_tags.join(", "));
    println!("  Patient types:   {}", options.patient_types.join(", "));
    println!();
    print_conditions(&browser);
    println!();

    // ── Filtering ─────────────────────────────────────────────────────────────

    println!("  Filter: specialty = Hygienist");
    browser.set_specialty_filter("Hygienist");
    print_conditions(&browser);
    println!();

    println!("  Filter: search = \"dry\"");
    browser.set_search_text("dry");
    print_conditions(&browser);
    println!();

    browser.set_specialty_filter(ALL);
    browser.set_search_text("");

    // ── Selection and resolution ──────────────────────────────────────────────

    browser.select_condition(&ConditionId::new("c-xerostomia"));
    for phase in ["Mild", "Moderate", "Severe"] {
        browser.select_phase(phase);
        print_recommendations(&browser);
    }
    println!();

    browser.select_phase("Moderate");
    for view in ["2", "3", "4", ALL] {
        browser.select_patient_type_view(view);
        print_recommendations(&browser);
    }
    println!();

    // ── Invalid phase ─────────────────────────────────────────────────────────

    let accepted = browser.select_phase("Post-Op");
    println!(
        "  select_phase(\"Post-Op\") accepted: {}; active phase still {}",
        accepted,
        browser
            .active_selection()
            .active()
            .map(|a| a.phase.as_str())
            .unwrap_or("-")
    );
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
