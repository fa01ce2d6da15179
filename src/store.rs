use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::SiftError;
use crate::workflow::{ApprovalDecision, RunReport, WorkflowState};

/// In-memory registry of runs, keyed by run id.
///
/// Suspended runs wait here for a reviewer. Terminal runs stay around too,
/// so a late decision gets a precise invalid-transition answer instead of a
/// not-found.
#[derive(Default)]
pub struct RunStore {
    runs: Mutex<HashMap<String, WorkflowState>>,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a run record.
    pub fn put(&self, state: WorkflowState) {
        self.lock().insert(state.id.clone(), state);
    }

    /// Snapshot of a run, if it exists.
    pub fn get(&self, id: &str) -> Option<WorkflowState> {
        self.lock().get(id).cloned()
    }

    /// Build a report for a stored run.
    pub fn report(&self, id: &str) -> Result<RunReport, SiftError> {
        let runs = self.lock();
        let state = runs
            .get(id)
            .ok_or_else(|| SiftError::RunNotFound(id.to_string()))?;
        Ok(RunReport::from_state(state))
    }

    /// Apply a reviewer decision to a parked run and hand back a working copy
    /// for the engine to drive forward.
    ///
    /// Validation and mutation happen under one lock acquisition, which is
    /// what makes the decision apply exactly once when two reviewers race.
    pub fn apply_decision(
        &self,
        id: &str,
        decision: ApprovalDecision,
    ) -> Result<WorkflowState, SiftError> {
        let mut runs = self.lock();
        let state = runs
            .get_mut(id)
            .ok_or_else(|| SiftError::RunNotFound(id.to_string()))?;
        state.apply_decision(decision)?;
        Ok(state.clone())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, WorkflowState>> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::workflow::{
        ApprovalStatus, DoneReason, OutreachDraft, RunLimits, RunStatus, StepKind,
    };

    fn suspended_state() -> WorkflowState {
        let mut state = WorkflowState::new("jd".into(), vec!["p".into()], RunLimits::default());
        state.outreach_draft = Some(OutreachDraft {
            subject: "s".into(),
            body: "b".into(),
            to: Some("hr@acme.io".into()),
        });
        state.last_step = StepKind::Draft;
        state.suspend();
        state
    }

    #[test]
    fn put_then_report() {
        let store = RunStore::new();
        let state = suspended_state();
        let id = state.id.clone();
        store.put(state);

        let report = store.report(&id).unwrap();
        assert_eq!(report.run_id, id);
        assert_eq!(report.status, RunStatus::Suspended);
    }

    #[test]
    fn unknown_run_is_not_found() {
        let store = RunStore::new();
        assert!(matches!(
            store.report("missing"),
            Err(SiftError::RunNotFound(_))
        ));
        assert!(matches!(
            store.apply_decision("missing", ApprovalDecision::Approved),
            Err(SiftError::RunNotFound(_))
        ));
    }

    #[test]
    fn decision_updates_both_copies() {
        let store = RunStore::new();
        let state = suspended_state();
        let id = state.id.clone();
        store.put(state);

        let working = store
            .apply_decision(&id, ApprovalDecision::Approved)
            .unwrap();
        assert_eq!(working.approval_status, ApprovalStatus::Approved);
        assert_eq!(working.last_step, StepKind::Approve);

        // The stored record moved too, so a second decision bounces.
        let err = store
            .apply_decision(&id, ApprovalDecision::Rejected)
            .unwrap_err();
        assert!(matches!(err, SiftError::InvalidTransition(_)));
        assert_eq!(
            store.get(&id).unwrap().approval_status,
            ApprovalStatus::Approved
        );
    }

    #[test]
    fn decision_on_terminal_run_is_invalid_not_missing() {
        let store = RunStore::new();
        let mut state = suspended_state();
        state.finish(DoneReason::RejectedByReviewer);
        let id = state.id.clone();
        store.put(state);

        let err = store
            .apply_decision(&id, ApprovalDecision::Approved)
            .unwrap_err();
        assert!(matches!(err, SiftError::InvalidTransition(_)));
    }

    #[test]
    fn racing_reviewers_land_exactly_one_decision() {
        let store = Arc::new(RunStore::new());
        let state = suspended_state();
        let id = state.id.clone();
        store.put(state);

        let handles: Vec<_> = [ApprovalDecision::Approved, ApprovalDecision::Rejected]
            .into_iter()
            .map(|decision| {
                let store = Arc::clone(&store);
                let id = id.clone();
                std::thread::spawn(move || store.apply_decision(&id, decision).is_ok())
            })
            .collect();

        let outcomes: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    }
}
