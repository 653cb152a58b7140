//! Scenario 2: Reload Consistency
//!
//! Shows how the session reconciles itself when the catalog changes:
//!   1. A reload keeps the selected condition and phase, resetting the view
//!   2. A stale reload response is discarded in favour of a newer one
//!   3. A failed products load degrades to an empty list (fail-open)
//!   4. Removing the selected condition falls back to the first match and
//!      resets a category filter that no longer exists

use std::sync::Arc;

use prism_contracts::{
    catalog::Dataset, condition::ConditionId, error::PrismResult, settings::ResolutionSettings,
};
use prism_core::{cache::CachedSource, fetch_snapshot, Browser};
use prism_validate::CatalogValidator;

use crate::{mock_data::reference_catalog, sources::MockCatalogSource};

use super::{print_conditions, print_recommendations};

/// Run Scenario 2: Reload Consistency.
pub fn run_scenario() -> PrismResult<()> {
    println!("=== Scenario 2: Reload Consistency ===");
    println!();

    // Keep a typed handle so the backing catalog can be edited between reloads.
    let source = Arc::new(CachedSource::with_default_ttl(MockCatalogSource::new(
        reference_catalog()?,
    )));
    let mut browser = Browser::new(
        source.clone(),
        Box::new(CatalogValidator::new()),
        ResolutionSettings::default(),
    );
    browser.reload(false);

    // ── 1. Selection survives a reload ────────────────────────────────────────

    browser.select_condition(&ConditionId::new("c-xerostomia"));
    browser.select_phase("Severe");
    browser.select_patient_type_view("4");
    print_recommendations(&browser);

    browser.reload(true);
    println!("  After forced reload:");
    print_recommendations(&browser);
    println!(
        "  Condition loads reaching the backend: {}",
        source.inner().condition_loads()
    );
    println!();

    // ── 2. Stale responses ────────────────────────────────────────────────────

    let slow = browser.begin_reload();
    let fast = browser.begin_reload();
    println!("  Two reloads in flight (loading: {})", browser.is_loading());

    let fast_result = fetch_snapshot(&*source, true);
    println!("  Newer response applied:  {}", browser.apply_reload(fast, fast_result));
    let slow_result = fetch_snapshot(&*source, true);
    println!("  Older response applied:  {}", browser.apply_reload(slow, slow_result));
    println!();

    // ── 3. Degraded load ──────────────────────────────────────────────────────

    source.inner().fail(Dataset::Products);
    browser.reload(true);
    println!("  Products backend down, status: {:?}", browser.status());
    print_recommendations(&browser);
    source.inner().recover(Dataset::Products);
    browser.reload(true);
    println!("  Products backend back, status: {:?}", browser.status());
    println!();

    // ── 4. Selected condition removed ─────────────────────────────────────────

    browser.set_category_filter("Oral Medicine");
    source
        .inner()
        .edit(|catalog| catalog.conditions.retain(|c| c.category != "Oral Medicine"));
    browser.reload(true);
    println!(
        "  Oral Medicine removed; category filter now \"{}\"",
        browser.criteria().category
    );
    print_conditions(&browser);
    print_recommendations(&browser);
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
