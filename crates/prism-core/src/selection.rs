//! The selection consistency manager.
//!
//! Holds the active condition, phase, and patient-type view, and reconciles
//! them whenever the filtered set or the underlying catalog changes. After
//! every transition the following holds: if a condition is selected, it is a
//! member of the filtered set passed to that transition and the active phase
//! is one of its phases.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use prism_contracts::{
    catalog::ALL,
    condition::{Condition, ConditionId},
    error::{PrismError, PrismResult},
};

/// The active condition, phase, and patient-type view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSelection {
    pub condition_id: ConditionId,
    pub phase: String,
    /// Patient-type view applied to recommendations; `"All"` shows only
    /// universally curated products.
    pub patient_type_view: String,
}

impl ActiveSelection {
    fn for_condition(condition: &Condition, phase: &str) -> Self {
        Self {
            condition_id: condition.id.clone(),
            phase: phase.to_string(),
            patient_type_view: ALL.to_string(),
        }
    }
}

/// The selection state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Active(ActiveSelection),
}

impl Selection {
    pub fn active(&self) -> Option<&ActiveSelection> {
        match self {
            Selection::None => None,
            Selection::Active(active) => Some(active),
        }
    }

    pub fn condition_id(&self) -> Option<&ConditionId> {
        self.active().map(|a| &a.condition_id)
    }
}

/// Owns the `Selection` and applies every transition to it.
#[derive(Debug, Default)]
pub struct SelectionManager {
    state: Selection,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Selection {
        &self.state
    }

    /// Reconcile after the catalog has been replaced.
    ///
    /// If `previous_condition_id` is still in `filtered`, it stays selected:
    /// the previously active phase is kept when the condition still defines
    /// it, otherwise the condition's first phase is used. The patient-type
    /// view resets to `"All"` either way. If the condition is gone, the first
    /// filtered condition is selected, or nothing when `filtered` is empty.
    pub fn on_catalog_reload(
        &mut self,
        filtered: &[&Condition],
        previous_condition_id: Option<&ConditionId>,
    ) {
        let previous_phase = match (&self.state, previous_condition_id) {
            (Selection::Active(active), Some(id)) if &active.condition_id == id => {
                Some(active.phase.clone())
            }
            _ => None,
        };

        let retained = previous_condition_id
            .and_then(|id| filtered.iter().find(|c| &c.id == id))
            .and_then(|condition| {
                let phase = previous_phase
                    .as_deref()
                    .filter(|phase| condition.has_phase(phase))
                    .or_else(|| condition.first_phase())?;
                Some(ActiveSelection::for_condition(condition, phase))
            });

        match retained {
            Some(active) => {
                debug!(
                    condition_id = %active.condition_id,
                    phase = %active.phase,
                    "selection retained across reload"
                );
                self.state = Selection::Active(active);
            }
            None => self.fall_back(filtered),
        }
    }

    /// Reconcile after the filter criteria changed.
    ///
    /// A selection still present in `filtered` is left untouched.
    pub fn on_filter_change(&mut self, filtered: &[&Condition]) {
        let still_visible = self
            .state
            .condition_id()
            .is_some_and(|id| filtered.iter().any(|c| &c.id == id));

        if !still_visible {
            self.fall_back(filtered);
        }
    }

    /// Explicitly select a condition from the filtered set.
    ///
    /// The phase becomes the condition's first phase and the patient-type view
    /// resets to `"All"`. Conditions outside `filtered` are refused so the
    /// selection never points at a filtered-out entry.
    pub fn select_condition(
        &mut self,
        filtered: &[&Condition],
        condition_id: &ConditionId,
    ) -> PrismResult<()> {
        let condition = filtered
            .iter()
            .find(|c| &c.id == condition_id)
            .ok_or_else(|| PrismError::UnknownCondition {
                id: condition_id.to_string(),
            })?;
        let phase = condition.first_phase().ok_or_else(|| PrismError::InvalidCondition {
            id: condition_id.to_string(),
            reason: "condition defines no phases".to_string(),
        })?;

        self.state = Selection::Active(ActiveSelection::for_condition(condition, phase));
        Ok(())
    }

    /// Switch the active phase.
    ///
    /// Returns `InvalidPhase` and leaves the state unchanged when `phase` is
    /// not one of the active condition's phases.
    pub fn select_phase(&mut self, filtered: &[&Condition], phase: &str) -> PrismResult<()> {
        let Selection::Active(active) = &mut self.state else {
            return Err(PrismError::NoActiveCondition);
        };
        let condition = filtered
            .iter()
            .find(|c| c.id == active.condition_id)
            .ok_or_else(|| PrismError::UnknownCondition {
                id: active.condition_id.to_string(),
            })?;

        if !condition.has_phase(phase) {
            return Err(PrismError::InvalidPhase {
                phase: phase.to_string(),
                condition: active.condition_id.to_string(),
            });
        }

        active.phase = phase.to_string();
        Ok(())
    }

    /// Switch the patient-type view. Any name is accepted; unknown names
    /// simply resolve to no recommendations.
    pub fn select_patient_type_view(&mut self, name: &str) -> PrismResult<()> {
        match &mut self.state {
            Selection::Active(active) => {
                active.patient_type_view = name.to_string();
                Ok(())
            }
            Selection::None => Err(PrismError::NoActiveCondition),
        }
    }

    /// True if the selection is consistent with `filtered`.
    pub fn is_consistent_with(&self, filtered: &[&Condition]) -> bool {
        match &self.state {
            Selection::None => true,
            Selection::Active(active) => filtered
                .iter()
                .find(|c| c.id == active.condition_id)
                .is_some_and(|c| c.has_phase(&active.phase)),
        }
    }

    /// Select the first filtered condition that has a phase, or nothing.
    fn fall_back(&mut self, filtered: &[&Condition]) {
        let first = filtered
            .iter()
            .find_map(|c| c.first_phase().map(|phase| ActiveSelection::for_condition(c, phase)));

        match first {
            Some(active) => {
                debug!(
                    condition_id = %active.condition_id,
                    phase = %active.phase,
                    "selection fell back to first filtered condition"
                );
                self.state = Selection::Active(active);
            }
            None => {
                if !filtered.is_empty() {
                    warn!(count = filtered.len(), "no filtered condition defines a phase");
                }
                self.state = Selection::None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use prism_contracts::condition::Recommendations;

    use super::*;

    fn condition(id: &str, phases: &[&str]) -> Condition {
        Condition {
            id: ConditionId::new(id),
            name: id.to_uppercase(),
            category: String::new(),
            specialty_tags: Default::default(),
            patient_type_names: Vec::new(),
            phases: phases.iter().map(|p| p.to_string()).collect(),
            recommendations: Recommendations::default(),
            product_details: Default::default(),
            condition_specific_research: Default::default(),
        }
    }

    fn active(manager: &SelectionManager) -> &ActiveSelection {
        manager.current().active().expect("expected an active selection")
    }

    #[test]
    fn initial_state_is_no_selection() {
        assert_eq!(*SelectionManager::new().current(), Selection::None);
    }

    #[test]
    fn reload_keeps_condition_and_valid_phase_and_resets_view() {
        let c1 = condition("C1", &["Acute", "Active"]);
        let c2 = condition("C2", &["Mild"]);
        let mut manager = SelectionManager::new();
        manager.select_condition(&[&c1, &c2], &c1.id).unwrap();
        manager.select_phase(&[&c1, &c2], "Active").unwrap();
        manager.select_patient_type_view("3").unwrap();

        let reloaded = condition("C1", &["Active", "Maintenance"]);
        let id = c1.id.clone();
        manager.on_catalog_reload(&[&c2, &reloaded], Some(&id));

        let a = active(&manager);
        assert_eq!(a.condition_id, id);
        assert_eq!(a.phase, "Active");
        assert_eq!(a.patient_type_view, ALL);
    }

    #[test]
    fn reload_defaults_phase_when_previous_phase_vanished() {
        let c1 = condition("C1", &["Acute", "Active"]);
        let mut manager = SelectionManager::new();
        manager.select_condition(&[&c1], &c1.id).unwrap();
        manager.select_phase(&[&c1], "Active").unwrap();

        let reloaded = condition("C1", &["Initial", "Maintenance"]);
        manager.on_catalog_reload(&[&reloaded], Some(&c1.id));

        assert_eq!(active(&manager).phase, "Initial");
    }

    #[test]
    fn reload_falls_back_to_first_condition_when_selection_vanished() {
        let c1 = condition("C1", &["Active"]);
        let mut manager = SelectionManager::new();
        manager.select_condition(&[&c1], &c1.id).unwrap();

        let c2 = condition("C2", &["Mild", "Severe"]);
        let c3 = condition("C3", &["Pre-op"]);
        manager.on_catalog_reload(&[&c2, &c3], Some(&c1.id));

        let a = active(&manager);
        assert_eq!(a.condition_id, c2.id);
        assert_eq!(a.phase, "Mild");
    }

    #[test]
    fn reload_into_empty_catalog_clears_selection() {
        let c1 = condition("C1", &["Active"]);
        let mut manager = SelectionManager::new();
        manager.select_condition(&[&c1], &c1.id).unwrap();

        manager.on_catalog_reload(&[], Some(&c1.id));

        assert_eq!(*manager.current(), Selection::None);
    }

    #[test]
    fn filter_change_keeps_visible_selection_untouched() {
        let c1 = condition("C1", &["Acute", "Active"]);
        let c2 = condition("C2", &["Mild"]);
        let mut manager = SelectionManager::new();
        manager.select_condition(&[&c1, &c2], &c2.id).unwrap();
        manager.select_patient_type_view("2").unwrap();

        manager.on_filter_change(&[&c1, &c2]);

        let a = active(&manager);
        assert_eq!(a.condition_id, c2.id);
        assert_eq!(a.patient_type_view, "2");
    }

    #[test]
    fn filter_change_falls_back_when_selection_filtered_out() {
        let c1 = condition("C1", &["Acute"]);
        let c2 = condition("C2", &["Mild"]);
        let mut manager = SelectionManager::new();
        manager.select_condition(&[&c1, &c2], &c1.id).unwrap();

        manager.on_filter_change(&[&c2]);
        assert_eq!(active(&manager).condition_id, c2.id);

        manager.on_filter_change(&[]);
        assert_eq!(*manager.current(), Selection::None);
    }

    #[test]
    fn invalid_phase_is_refused_without_state_change() {
        let c1 = condition("C1", &["Acute", "Active"]);
        let mut manager = SelectionManager::new();
        manager.select_condition(&[&c1], &c1.id).unwrap();
        let before = manager.current().clone();

        let result = manager.select_phase(&[&c1], "Chronic");

        assert!(matches!(result, Err(PrismError::InvalidPhase { .. })));
        assert_eq!(*manager.current(), before);
    }

    #[test]
    fn selecting_a_condition_outside_the_filtered_set_is_refused() {
        let c1 = condition("C1", &["Acute"]);
        let hidden = ConditionId::new("C9");
        let mut manager = SelectionManager::new();

        let result = manager.select_condition(&[&c1], &hidden);

        assert!(matches!(result, Err(PrismError::UnknownCondition { .. })));
        assert_eq!(*manager.current(), Selection::None);
    }

    #[test]
    fn view_change_without_selection_is_refused() {
        let mut manager = SelectionManager::new();
        assert!(matches!(
            manager.select_patient_type_view("1"),
            Err(PrismError::NoActiveCondition)
        ));
    }

    #[test]
    fn invariant_holds_across_a_transition_sequence() {
        let a = condition("A", &["Acute", "Active"]);
        let b = condition("B", &["Mild"]);
        let c = condition("C", &["Pre-op", "Post-op"]);
        let b_reloaded = condition("B", &["Severe"]);
        let mut manager = SelectionManager::new();

        let steps: Vec<Vec<&Condition>> = vec![
            vec![&a, &b, &c],
            vec![&b, &c],
            vec![&c],
            vec![],
            vec![&b_reloaded, &a],
        ];

        for (index, filtered) in steps.iter().enumerate() {
            if index % 2 == 0 {
                let previous = manager.current().condition_id().cloned();
                manager.on_catalog_reload(filtered, previous.as_ref());
            } else {
                manager.on_filter_change(filtered);
            }
            assert!(
                manager.is_consistent_with(filtered),
                "selection inconsistent after step {}: {:?}",
                index,
                manager.current()
            );
            if let Some(first) = filtered.last() {
                manager.select_condition(filtered, &first.id).unwrap();
                assert!(manager.is_consistent_with(filtered));
            }
        }
    }
}
