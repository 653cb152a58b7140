//! # prism-ref-dental
//!
//! Dental reference runtime for the Prism clinical reference engine.
//!
//! Demonstrates three browsing scenarios against a fictional catalog:
//!
//! 1. **Browse and Resolve**: filters, phase changes, and patient-type views.
//! 2. **Reload Consistency**: selection retention, stale responses, degraded
//!    loads, and fallback when the selected condition disappears.
//! 3. **Legacy Catalog Entries**: the legacy inference switch.
//!
//! All data is hardcoded and fictional. No external systems are contacted.

pub mod mock_data;
pub mod scenarios;
pub mod sources;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use prism_contracts::{
        catalog::{Dataset, ALL},
        condition::ConditionId,
        settings::ResolutionSettings,
    };
    use prism_core::{Browser, CatalogStatus};
    use prism_validate::CatalogValidator;

    use crate::{mock_data::reference_catalog, sources::MockCatalogSource};

    fn browser(settings: ResolutionSettings) -> (Arc<MockCatalogSource>, Browser) {
        let source = Arc::new(MockCatalogSource::new(reference_catalog().unwrap()));
        let mut browser = Browser::new(source.clone(), Box::new(CatalogValidator::new()), settings);
        assert!(browser.reload(false));
        (source, browser)
    }

    // ── End-to-end over the reference catalog ─────────────────────────────────

    #[test]
    fn dry_mouth_moderate_per_type() {
        let (_, mut browser) = browser(ResolutionSettings::default());
        assert!(browser.select_condition(&ConditionId::new("c-xerostomia")));
        assert!(browser.select_phase("Moderate"));

        assert_eq!(browser.resolved_products(), vec!["Moisyn Rinse"]);
        assert!(browser.select_patient_type_view("4"));
        assert_eq!(
            browser.resolved_products(),
            vec!["ProVantage Gel", "Chlorhexidine 0.12%"]
        );
        assert!(browser.select_patient_type_view("1"));
        assert!(browser.resolved_products().is_empty());
    }

    #[test]
    fn gingivitis_inferred_for_type_three() {
        let (_, mut browser) = browser(ResolutionSettings::with_legacy_inference());
        assert!(browser.select_condition(&ConditionId::new("c-gingivitis")));
        assert!(browser.select_patient_type_view("3"));

        assert_eq!(
            browser.resolved_products(),
            vec!["Chlorhexidine 0.12%", "ProVantage Gel"]
        );
        let annotated = browser.recommendations();
        assert!(annotated[0].available);
        assert!(!annotated[1].available, "ProVantage Gel is out of stock");
        assert!(annotated[0].details.is_some());
    }

    #[test]
    fn hygienist_filter_matches_two_conditions() {
        let (_, mut browser) = browser(ResolutionSettings::default());
        browser.set_specialty_filter("Hygienist");

        let names: Vec<&str> = browser
            .filtered_conditions()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Dry Mouth (Xerostomia)", "Gingivitis"]);
    }

    #[test]
    fn products_outage_is_fail_open() {
        let (source, mut browser) = browser(ResolutionSettings::default());
        source.fail(Dataset::Products);
        browser.reload(true);

        assert_eq!(
            browser.status(),
            &CatalogStatus::Degraded { failed: vec![Dataset::Products] }
        );
        assert!(browser.recommendations().iter().all(|p| p.available));
    }

    #[test]
    fn removing_selected_condition_falls_back() {
        let (source, mut browser) = browser(ResolutionSettings::default());
        assert!(browser.select_condition(&ConditionId::new("c-implant")));
        source.edit(|catalog| catalog.conditions.retain(|c| c.id.as_str() != "c-implant"));
        browser.reload(true);

        let active = browser.active_selection().active().unwrap();
        assert_eq!(active.condition_id.as_str(), "c-xerostomia");
        assert_eq!(active.phase, "Mild");
        assert_eq!(active.patient_type_view, ALL);
    }

    #[test]
    fn scenarios_run_cleanly() {
        crate::scenarios::browse::run_scenario().unwrap();
        crate::scenarios::reload::run_scenario().unwrap();
        crate::scenarios::legacy::run_scenario().unwrap();
    }
}
