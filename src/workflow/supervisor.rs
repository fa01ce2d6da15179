use serde::{Deserialize, Serialize};

use super::state::{
    AbortReason, ApprovalStatus, DoneReason, Phase, SendStatus, StepKind, Termination,
    WorkflowState,
};

/// A processing step the supervisor can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Evaluate,
    Draft,
    Send,
}

/// What the supervisor wants done next with a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Dispatch a processing step.
    Run(Step),
    /// Park the run at the approval gate.
    Suspend,
    /// Close the run out normally.
    Finish(DoneReason),
    /// Force-terminate the run.
    Abort(AbortReason),
}

impl Decision {
    /// The phase a run enters when this decision is carried out.
    pub fn phase(&self) -> Phase {
        match self {
            Decision::Run(Step::Evaluate) => Phase::Evaluating,
            Decision::Run(Step::Draft) => Phase::Drafting,
            Decision::Run(Step::Send) => Phase::Sending,
            Decision::Suspend => Phase::AwaitingApproval,
            Decision::Finish(_) => Phase::Done,
            Decision::Abort(_) => Phase::Aborted,
        }
    }

    /// The routing label this decision corresponds to, for comparison against
    /// a model-produced hint. Suspensions and aborts have no label: they are
    /// rule-only outcomes the hint vocabulary cannot express.
    pub fn hint_label(&self) -> Option<RouteLabel> {
        match self {
            Decision::Run(Step::Evaluate) => Some(RouteLabel::Evaluate),
            Decision::Run(Step::Draft) => Some(RouteLabel::Draft),
            Decision::Run(Step::Send) => Some(RouteLabel::Send),
            Decision::Finish(_) => Some(RouteLabel::Finish),
            Decision::Suspend | Decision::Abort(_) => None,
        }
    }
}

/// The vocabulary a routing hint may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteLabel {
    Evaluate,
    Draft,
    Send,
    Finish,
}

impl RouteLabel {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "evaluate" => Some(RouteLabel::Evaluate),
            "draft" => Some(RouteLabel::Draft),
            "send" => Some(RouteLabel::Send),
            "finish" => Some(RouteLabel::Finish),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteLabel::Evaluate => "evaluate",
            RouteLabel::Draft => "draft",
            RouteLabel::Send => "send",
            RouteLabel::Finish => "finish",
        }
    }
}

/// Routes runs through the screening workflow.
///
/// Every decision comes out of a fixed table over the run record. A language
/// model may offer a routing hint, but the table always has the final word.
pub struct Supervisor;

impl Supervisor {
    /// Make one routing decision and record it on the run.
    ///
    /// Increments the step counter, refuses to route past the ceiling, and
    /// appends the resulting phase to the run's history.
    pub fn route(state: &mut WorkflowState) -> Decision {
        if state.step_count >= state.limits.max_steps {
            let decision = Decision::Abort(AbortReason::LoopCeiling {
                ceiling: state.limits.max_steps,
            });
            state.phase_history.push(decision.phase());
            state.touch();
            return decision;
        }

        state.step_count += 1;
        let decision = Self::decide(state);
        state.phase_history.push(decision.phase());
        state.touch();
        decision
    }

    /// The routing table. Pure over the run record.
    ///
    /// - Nothing has run yet: evaluate the batch.
    /// - Evaluation done: draft if anyone qualified, otherwise finish.
    /// - Draft in hand: park for approval until a decision lands.
    /// - Decision in: send on approval, finish on rejection.
    /// - Send attempted: finish either way; dispatch never retries.
    pub fn decide(state: &WorkflowState) -> Decision {
        if let Some(termination) = &state.termination {
            return match termination {
                Termination::Done(reason) => Decision::Finish(reason.clone()),
                Termination::Aborted(reason) => Decision::Abort(reason.clone()),
            };
        }

        match state.last_step {
            StepKind::None => Decision::Run(Step::Evaluate),
            StepKind::Evaluate => {
                if state.qualified_matches.is_empty() {
                    Decision::Finish(DoneReason::NoQualifiedCandidates)
                } else {
                    Decision::Run(Step::Draft)
                }
            }
            StepKind::Draft => {
                if state.outreach_draft.is_none() {
                    return Decision::Abort(AbortReason::InvalidRoute(
                        "drafting step left no draft behind".into(),
                    ));
                }
                match state.approval_status {
                    ApprovalStatus::NotRequested | ApprovalStatus::Pending => Decision::Suspend,
                    ApprovalStatus::Approved => Decision::Run(Step::Send),
                    ApprovalStatus::Rejected => Decision::Finish(DoneReason::RejectedByReviewer),
                }
            }
            StepKind::Approve => match state.approval_status {
                ApprovalStatus::Approved => Decision::Run(Step::Send),
                ApprovalStatus::Rejected => Decision::Finish(DoneReason::RejectedByReviewer),
                ApprovalStatus::NotRequested | ApprovalStatus::Pending => {
                    Decision::Abort(AbortReason::InvalidRoute(
                        "approval step recorded without a decision".into(),
                    ))
                }
            },
            StepKind::Send => match &state.send_status {
                SendStatus::Sent => Decision::Finish(DoneReason::Sent),
                SendStatus::Failed { .. } => Decision::Finish(DoneReason::SendFailed),
                SendStatus::NotSent => Decision::Abort(AbortReason::InvalidRoute(
                    "send step left no dispatch record".into(),
                )),
            },
        }
    }
}
