//! Dental reference demo scenarios.
//!
//! Each scenario wires a real `Browser` (cached source, catalog validator,
//! resolution settings) to the fictional reference catalog and walks through
//! one part of the browsing pipeline, printing what a clinician would see.

pub mod browse;
pub mod legacy;
pub mod reload;

use prism_contracts::catalog::describe_patient_types;
use prism_core::{details, Browser};

// ── Shared printing helpers ───────────────────────────────────────────────────

/// Print the filtered condition list, marking the active condition.
pub fn print_conditions(browser: &Browser) {
    let active = browser.active_selection().condition_id().cloned();
    let filtered = browser.filtered_conditions();
    if filtered.is_empty() {
        println!("  (no conditions match the current filters)");
        return;
    }
    for condition in filtered {
        let marker = if Some(&condition.id) == active.as_ref() { ">" } else { " " };
        println!(
            "  {} {:<26} {:<16} {}",
            marker,
            condition.name,
            condition.category,
            describe_patient_types(&condition.patient_type_names)
        );
    }
}

/// Print the annotated recommendations for the active selection.
pub fn print_recommendations(browser: &Browser) {
    let (Some(selection), Some(condition)) =
        (browser.active_selection().active(), browser.active_condition())
    else {
        println!("  No condition selected.");
        return;
    };

    println!(
        "  {} / {} / patient type {}:",
        condition.name, selection.phase, selection.patient_type_view
    );

    let recommendations = browser.recommendations();
    if recommendations.is_empty() {
        println!("    (no recommendations)");
        return;
    }

    for product in recommendations {
        println!(
            "    - {:<26} {}{}",
            product.name,
            if product.available { "available" } else { "UNAVAILABLE" },
            if product.restricted { "  [restricted]" } else { "" }
        );
        if let Some(usage) =
            details::usage_for_phase(condition, &product.id, &selection.phase, browser.settings())
        {
            println!("        usage: {}", usage);
        }
        if let Some(article) =
            details::product_research(condition, &product.id, browser.settings()).first()
        {
            println!("        research: {} ({})", article.title, article.author);
        }
    }
}
