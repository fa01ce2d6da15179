mod state;
mod supervisor;

pub use state::{
    AbortReason, ApprovalDecision, ApprovalStatus, CandidateRecord, DoneReason, OutreachDraft,
    Phase, RunLimits, RunReport, RunStatus, SendStatus, StepKind, Termination, WorkflowState,
};
pub use supervisor::{Decision, RouteLabel, Step, Supervisor};
