//! The browsing session: the reactive pipeline over one catalog snapshot.
//!
//!   reload → validate → swap snapshot → reconcile criteria → filter
//!          → reconcile selection → rebuild plan → resolve → annotate
//!
//! The `Browser` is the only holder of mutable state. Every mutator reruns
//! the downstream stages synchronously before returning, so getters always
//! observe a consistent snapshot, selection, and plan.
//!
//! Reloads are split into `begin_reload` (issues a ticket) and
//! `apply_reload` (swaps the snapshot) so that the fetch can happen off the
//! session. A ticket older than the last applied one is discarded: requests
//! win by issue order, not arrival order.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use prism_contracts::{
    catalog::{Dataset, PatientType, Product},
    condition::{Condition, ConditionId},
    error::PrismResult,
    settings::ResolutionSettings,
};

use crate::{
    availability::{annotate, is_available, AnnotatedProduct},
    filter::{filter, FilterCriteria, FilterOptions},
    resolver::RecommendationPlan,
    selection::{Selection, SelectionManager},
    traits::{CatalogSource, ConditionValidator},
};

pub use crate::traits::FetchedCatalog;

/// Identifies one reload request in issue order. Only `begin_reload` issues
/// tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReloadTicket(u64);

impl ReloadTicket {
    /// Position of this request in issue order, starting at 1.
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Fetch all three datasets from `source` for one reload.
///
/// Nothing is returned until every dataset has been fetched, so a caller can
/// never observe one dataset without the other two.
pub fn fetch_snapshot(source: &dyn CatalogSource, force_refresh: bool) -> FetchedCatalog {
    debug!(force_refresh, "fetching catalog snapshot");
    source.load_catalog(force_refresh)
}

/// The catalog currently applied to the session.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub conditions: Vec<Condition>,
    pub products: Vec<Product>,
    pub patient_types: Vec<PatientType>,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Load state reported to the presentation boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "state")]
pub enum CatalogStatus {
    #[default]
    NotLoaded,
    Ready,
    /// At least one dataset failed and was replaced by an empty list.
    Degraded { failed: Vec<Dataset> },
}

/// A browsing session over the clinical reference catalog.
pub struct Browser {
    source: Arc<dyn CatalogSource>,
    validator: Box<dyn ConditionValidator>,
    settings: ResolutionSettings,
    catalog: CatalogSnapshot,
    criteria: FilterCriteria,
    selection: SelectionManager,
    plan: Option<RecommendationPlan>,
    status: CatalogStatus,
    issued: u64,
    applied: u64,
}

impl Browser {
    /// Create an empty session. Nothing is loaded until `reload()`.
    pub fn new(
        source: Arc<dyn CatalogSource>,
        validator: Box<dyn ConditionValidator>,
        settings: ResolutionSettings,
    ) -> Self {
        Self {
            source,
            validator,
            settings,
            catalog: CatalogSnapshot::default(),
            criteria: FilterCriteria::default(),
            selection: SelectionManager::new(),
            plan: None,
            status: CatalogStatus::NotLoaded,
            issued: 0,
            applied: 0,
        }
    }

    // ── Reload ───────────────────────────────────────────────────────────────

    /// Fetch all three datasets and apply them as one snapshot.
    ///
    /// Returns true if the snapshot was applied.
    pub fn reload(&mut self, force_refresh: bool) -> bool {
        let ticket = self.begin_reload();
        let fetched = fetch_snapshot(&*self.source, force_refresh);
        self.apply_reload(ticket, fetched)
    }

    /// Issue a ticket for a reload whose fetch the caller will run.
    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.issued += 1;
        debug!(ticket = self.issued, "reload issued");
        ReloadTicket(self.issued)
    }

    /// Apply the results of the reload identified by `ticket`.
    ///
    /// A ticket not newer than the last applied one, or never issued by this
    /// session, is dropped and false is returned. Otherwise the three datasets replace the current snapshot
    /// together; failed datasets become empty and are listed in
    /// `CatalogStatus::Degraded`. Criteria and selection are reconciled
    /// before this returns.
    pub fn apply_reload(&mut self, ticket: ReloadTicket, fetched: FetchedCatalog) -> bool {
        if ticket.0 <= self.applied {
            warn!(
                ticket = ticket.0,
                applied = self.applied,
                "discarding stale reload response"
            );
            return false;
        }
        if ticket.0 > self.issued {
            warn!(
                ticket = ticket.0,
                issued = self.issued,
                "discarding reload response for a ticket this session never issued"
            );
            return false;
        }

        let mut failed = Vec::new();
        let conditions = accept(fetched.conditions, Dataset::Conditions, &mut failed);
        let products = accept(fetched.products, Dataset::Products, &mut failed);
        let patient_types = accept(fetched.patient_types, Dataset::PatientTypes, &mut failed);
        let conditions = self.admit(conditions);

        let previous = self.selection.current().condition_id().cloned();

        self.catalog = CatalogSnapshot {
            conditions,
            products,
            patient_types,
            loaded_at: Some(Utc::now()),
        };
        self.applied = ticket.0;
        self.status = if failed.is_empty() {
            CatalogStatus::Ready
        } else {
            CatalogStatus::Degraded { failed }
        };

        let options = FilterOptions::from_catalog(&self.catalog.conditions, &self.catalog.patient_types);
        let reset = self.criteria.reconcile(&options);
        if !reset.is_empty() {
            info!(criteria = ?reset, "filter criteria reset after reload");
        }

        let filtered = filter(&self.catalog.conditions, &self.criteria);
        self.selection.on_catalog_reload(&filtered, previous.as_ref());
        debug_assert!(self.selection.is_consistent_with(&filtered));

        self.plan = None;
        self.refresh_plan();

        info!(
            ticket = ticket.0,
            conditions = self.catalog.conditions.len(),
            products = self.catalog.products.len(),
            patient_types = self.catalog.patient_types.len(),
            status = ?self.status,
            "catalog snapshot applied"
        );
        true
    }

    /// Drop duplicate ids and conditions the validator rejects.
    fn admit(&self, conditions: Vec<Condition>) -> Vec<Condition> {
        let mut seen = HashSet::new();
        conditions
            .into_iter()
            .filter(|condition| {
                if !seen.insert(condition.id.clone()) {
                    warn!(condition_id = %condition.id, "duplicate condition id rejected");
                    return false;
                }
                let report = self.validator.validate(condition);
                if !report.passed {
                    warn!(
                        condition_id = %condition.id,
                        failures = %report.summary(),
                        "condition rejected by validator"
                    );
                }
                report.passed
            })
            .collect()
    }

    // ── Filter mutators ──────────────────────────────────────────────────────

    pub fn set_category_filter(&mut self, category: impl Into<String>) {
        self.criteria.category = category.into();
        self.apply_filter_change();
    }

    pub fn set_specialty_filter(&mut self, specialty_tag: impl Into<String>) {
        self.criteria.specialty_tag = specialty_tag.into();
        self.apply_filter_change();
    }

    pub fn set_patient_type_filter(&mut self, patient_type_name: impl Into<String>) {
        self.criteria.patient_type_name = patient_type_name.into();
        self.apply_filter_change();
    }

    pub fn set_search_text(&mut self, search_text: impl Into<String>) {
        self.criteria.search_text = search_text.into();
        self.apply_filter_change();
    }

    fn apply_filter_change(&mut self) {
        let filtered = filter(&self.catalog.conditions, &self.criteria);
        self.selection.on_filter_change(&filtered);
        debug_assert!(self.selection.is_consistent_with(&filtered));
        self.refresh_plan();
    }

    // ── Selection mutators ───────────────────────────────────────────────────

    /// Select a condition from the filtered set. Returns false, leaving the
    /// selection unchanged, if it is not in that set.
    pub fn select_condition(&mut self, condition_id: &ConditionId) -> bool {
        let filtered = filter(&self.catalog.conditions, &self.criteria);
        let result = self.selection.select_condition(&filtered, condition_id);
        self.absorb(result, "select condition")
    }

    /// Switch the active phase. Returns false, leaving the selection
    /// unchanged, if the active condition does not define `phase`.
    pub fn select_phase(&mut self, phase: &str) -> bool {
        let filtered = filter(&self.catalog.conditions, &self.criteria);
        let result = self.selection.select_phase(&filtered, phase);
        self.absorb(result, "select phase")
    }

    /// Switch the patient-type view. Any name is accepted while a condition
    /// is selected.
    pub fn select_patient_type_view(&mut self, name: &str) -> bool {
        let result = self.selection.select_patient_type_view(name);
        self.absorb(result, "select patient-type view")
    }

    fn absorb(&mut self, result: PrismResult<()>, operation: &str) -> bool {
        match result {
            Ok(()) => {
                self.refresh_plan();
                true
            }
            Err(e) => {
                warn!(operation, error = %e, "selection change ignored");
                false
            }
        }
    }

    fn refresh_plan(&mut self) {
        let Some(active) = self.selection.current().active() else {
            self.plan = None;
            return;
        };
        if self
            .plan
            .as_ref()
            .is_some_and(|plan| plan.condition_id == active.condition_id)
        {
            return;
        }
        self.plan = self
            .catalog
            .conditions
            .iter()
            .find(|c| c.id == active.condition_id)
            .map(|c| RecommendationPlan::for_condition(c, &self.settings));
    }

    // ── Presentation getters ─────────────────────────────────────────────────

    pub fn filtered_conditions(&self) -> Vec<&Condition> {
        filter(&self.catalog.conditions, &self.criteria)
    }

    pub fn active_selection(&self) -> &Selection {
        self.selection.current()
    }

    pub fn active_condition(&self) -> Option<&Condition> {
        let id = self.selection.current().condition_id()?;
        self.catalog.conditions.iter().find(|c| &c.id == id)
    }

    /// Deduplicated product identifiers for the active selection.
    pub fn resolved_products(&self) -> Vec<String> {
        match (self.selection.current().active(), &self.plan) {
            (Some(active), Some(plan)) => plan.resolve(&active.phase, &active.patient_type_view),
            _ => Vec::new(),
        }
    }

    /// Availability of `product_id`; unknown products count as available.
    pub fn product_availability(&self, product_id: &str) -> bool {
        is_available(product_id, &self.catalog.products, &self.settings)
    }

    /// Resolved products with availability and details attached.
    pub fn recommendations(&self) -> Vec<AnnotatedProduct> {
        match self.active_condition() {
            Some(condition) => annotate(
                &self.resolved_products(),
                condition,
                &self.catalog.products,
                &self.settings,
            ),
            None => Vec::new(),
        }
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_catalog(&self.catalog.conditions, &self.catalog.patient_types)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn catalog(&self) -> &CatalogSnapshot {
        &self.catalog
    }

    pub fn settings(&self) -> &ResolutionSettings {
        &self.settings
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    /// True while a reload has been issued but no newer snapshot applied.
    pub fn is_loading(&self) -> bool {
        self.issued > self.applied
    }

    /// True if the filtered set is empty.
    pub fn is_empty(&self) -> bool {
        self.filtered_conditions().is_empty()
    }

    /// The loader behind this session, for callers that fetch off-session.
    pub fn source(&self) -> Arc<dyn CatalogSource> {
        Arc::clone(&self.source)
    }
}

fn accept<T>(result: PrismResult<Vec<T>>, dataset: Dataset, failed: &mut Vec<Dataset>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(%dataset, error = %e, "dataset load failed, using empty list");
            failed.push(dataset);
            Vec::new()
        }
    }
}
