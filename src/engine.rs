use std::sync::Arc;

use crate::drafter::{self, DraftError};
use crate::error::SiftError;
use crate::evaluator::{self, EvaluationError};
use crate::groq::ChatSender;
use crate::router;
use crate::sender::{self, Transport};
use crate::store::RunStore;
use crate::workflow::{
    AbortReason, ApprovalDecision, ApprovalStatus, Decision, RunLimits, RunReport, RunStatus,
    Step, StepKind, Supervisor, WorkflowState,
};

/// Drives runs through the supervisor loop.
///
/// Generic over the oracle and the mail transport so tests can swap both.
/// Step failures never escape as errors: they are folded into the run record
/// and the supervisor closes the run out from there.
pub struct WorkflowEngine<C, T> {
    /// Optional oracle client; without one, scoring degrades and runs finish
    /// with no qualified candidates.
    oracle: Option<C>,
    transport: T,
    model: String,
    llm_routing: bool,
}

impl<C: ChatSender, T: Transport> WorkflowEngine<C, T> {
    pub fn new(oracle: Option<C>, transport: T, model: impl Into<String>) -> Self {
        Self {
            oracle,
            transport,
            model: model.into(),
            llm_routing: false,
        }
    }

    /// Enable the advisory routing hint alongside each supervisor decision.
    pub fn with_llm_routing(mut self, enabled: bool) -> Self {
        self.llm_routing = enabled;
        self
    }

    /// Drive a run until it terminates or parks at the approval gate.
    pub async fn advance(&self, state: &mut WorkflowState) {
        if state.termination.is_some() {
            return;
        }
        if state.status == RunStatus::Pending {
            state.status = RunStatus::InProgress;
        }

        loop {
            let decision = Supervisor::route(state);
            self.consult_hint(state, &decision).await;

            match decision {
                Decision::Run(Step::Evaluate) => {
                    let result = if state.candidates.is_empty() {
                        state.qualified_matches.clear();
                        Ok(())
                    } else if let Some(client) = &self.oracle {
                        evaluator::evaluate(client, &self.model, state).await
                    } else {
                        Err(EvaluationError::OracleUnavailable)
                    };
                    if let Err(err) = result {
                        log_degraded(&err);
                        state.evaluation_error = Some(err.to_string());
                        state.qualified_matches.clear();
                    }
                    state.last_step = StepKind::Evaluate;
                }
                Decision::Run(Step::Draft) => {
                    let result = match &self.oracle {
                        Some(client) => drafter::draft_outreach(client, &self.model, state).await,
                        None => Err(DraftError::OracleUnavailable),
                    };
                    match result {
                        Ok(()) => state.last_step = StepKind::Draft,
                        Err(err) => {
                            state.abort(AbortReason::DraftFailed(err.to_string()));
                            return;
                        }
                    }
                }
                Decision::Run(Step::Send) => {
                    // Dispatch is gated twice: the routing table already
                    // requires an approved draft, and this guard holds even
                    // if a future routing source misbehaves.
                    if state.approval_status != ApprovalStatus::Approved
                        || state.outreach_draft.is_none()
                    {
                        state.abort(AbortReason::InvalidRoute(
                            "send routed without an approved draft".into(),
                        ));
                        return;
                    }
                    sender::send_outreach(&self.transport, state).await;
                    state.last_step = StepKind::Send;
                }
                Decision::Suspend => {
                    state.suspend();
                    return;
                }
                Decision::Finish(reason) => {
                    state.finish(reason);
                    return;
                }
                Decision::Abort(reason) => {
                    state.abort(reason);
                    return;
                }
            }
        }
    }

    /// Apply a reviewer decision to a run the caller holds, then drive it on.
    pub async fn resume(
        &self,
        state: &mut WorkflowState,
        decision: ApprovalDecision,
    ) -> Result<(), SiftError> {
        state.apply_decision(decision)?;
        self.advance(state).await;
        Ok(())
    }

    async fn consult_hint(&self, state: &WorkflowState, decision: &Decision) {
        if !self.llm_routing {
            return;
        }
        let (Some(client), Some(expected)) = (&self.oracle, decision.hint_label()) else {
            return;
        };
        match router::route_hint(client, &self.model, state).await {
            Ok(hint) if hint != expected => log_hint_overruled(hint.as_str(), expected.as_str()),
            Ok(_) => {}
            // A hint that never arrives is no hint at all.
            Err(_) => {}
        }
    }
}

/// High-level facade over engine and store: start runs, resume them with
/// reviewer decisions, report on any run the store knows.
pub struct Screener<C, T> {
    engine: WorkflowEngine<C, T>,
    store: Arc<RunStore>,
    limits: RunLimits,
}

impl<C: ChatSender, T: Transport> Screener<C, T> {
    pub fn new(engine: WorkflowEngine<C, T>, store: Arc<RunStore>, limits: RunLimits) -> Self {
        Self {
            engine,
            store,
            limits,
        }
    }

    /// Start a run over a job description and candidate batch, driving it
    /// until it terminates or parks for approval.
    pub async fn start(
        &self,
        job_description: impl Into<String>,
        profiles: Vec<String>,
    ) -> RunReport {
        let mut state =
            WorkflowState::new(job_description.into(), profiles, self.limits.clone());
        self.engine.advance(&mut state).await;
        let report = RunReport::from_state(&state);
        self.store.put(state);
        report
    }

    /// Apply a reviewer decision to a parked run and drive it to the end.
    pub async fn resume(
        &self,
        id: &str,
        decision: ApprovalDecision,
    ) -> Result<RunReport, SiftError> {
        let mut state = self.store.apply_decision(id, decision)?;
        self.engine.advance(&mut state).await;
        let report = RunReport::from_state(&state);
        self.store.put(state);
        Ok(report)
    }

    /// Report on a stored run.
    pub fn report(&self, id: &str) -> Result<RunReport, SiftError> {
        self.store.report(id)
    }
}

fn log_degraded(err: &EvaluationError) {
    eprintln!("  ⚠ Scoring degraded, run continues with no matches: {err}");
}

fn log_hint_overruled(hint: &str, ruled: &str) {
    eprintln!("  ⚠ Routing hint said '{hint}', rule table chose '{ruled}'; rules win");
}
