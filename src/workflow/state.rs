use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SiftError;

/// The phases a screening run moves through.
///
/// Each run flows through: START → EVALUATING → DRAFTING → AWAITING_APPROVAL
/// → SENDING → DONE, with ABORTED reachable from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Start,
    Evaluating,
    Drafting,
    AwaitingApproval,
    Sending,
    Done,
    Aborted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Start => write!(f, "START"),
            Phase::Evaluating => write!(f, "EVALUATING"),
            Phase::Drafting => write!(f, "DRAFTING"),
            Phase::AwaitingApproval => write!(f, "AWAITING_APPROVAL"),
            Phase::Sending => write!(f, "SENDING"),
            Phase::Done => write!(f, "DONE"),
            Phase::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// Tracks the lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Pending,
    InProgress,
    /// Parked at the approval gate until a reviewer decides.
    Suspended,
    Done,
    Aborted,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::InProgress => write!(f, "in progress"),
            RunStatus::Suspended => write!(f, "suspended"),
            RunStatus::Done => write!(f, "done"),
            RunStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// The last processing step that ran to completion on a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    None,
    Evaluate,
    Draft,
    Approve,
    Send,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::None => write!(f, "none"),
            StepKind::Evaluate => write!(f, "evaluate"),
            StepKind::Draft => write!(f, "draft"),
            StepKind::Approve => write!(f, "approve"),
            StepKind::Send => write!(f, "send"),
        }
    }
}

/// Where a run stands with the human reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    /// No draft has reached the gate yet.
    NotRequested,
    /// A draft is parked at the gate waiting for a decision.
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::NotRequested => write!(f, "not requested"),
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A reviewer's verdict on a parked draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

/// Outcome of the outreach dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendStatus {
    NotSent,
    Sent,
    Failed { reason: String },
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendStatus::NotSent => write!(f, "not sent"),
            SendStatus::Sent => write!(f, "sent"),
            SendStatus::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Why a run reached DONE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoneReason {
    NoQualifiedCandidates,
    RejectedByReviewer,
    Sent,
    SendFailed,
}

impl fmt::Display for DoneReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoneReason::NoQualifiedCandidates => write!(f, "no qualified candidates"),
            DoneReason::RejectedByReviewer => write!(f, "rejected by reviewer"),
            DoneReason::Sent => write!(f, "sent successfully"),
            DoneReason::SendFailed => write!(f, "send failed"),
        }
    }
}

/// Why a run was force-terminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// The supervisor hit its routing ceiling before reaching a terminal phase.
    LoopCeiling { ceiling: u32 },
    DraftFailed(String),
    /// A step was routed in a state that does not permit it.
    InvalidRoute(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::LoopCeiling { ceiling } => {
                write!(f, "routing ceiling of {ceiling} steps exceeded")
            }
            AbortReason::DraftFailed(msg) => write!(f, "draft generation failed: {msg}"),
            AbortReason::InvalidRoute(msg) => write!(f, "invalid transition: {msg}"),
        }
    }
}

/// Terminal verdict for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Done(DoneReason),
    Aborted(AbortReason),
}

impl Termination {
    /// Human-readable terminal reason, as surfaced in reports.
    pub fn reason(&self) -> String {
        match self {
            Termination::Done(r) => r.to_string(),
            Termination::Aborted(r) => format!("aborted: {r}"),
        }
    }
}

/// Per-run tunables carried on the state record so a resumed run behaves
/// exactly like it did before suspension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLimits {
    /// Scores strictly above this value qualify a candidate (0-100).
    pub qualify_threshold: u8,
    /// Maximum routing decisions the supervisor will make in one run.
    pub max_steps: u32,
    /// Longest candidate profile, in characters, embedded into a prompt.
    pub max_profile_chars: usize,
    /// How many times the scoring call is retried before the run degrades.
    pub eval_retries: u32,
    /// Base delay in milliseconds for exponential backoff between retries.
    pub retry_base_delay_ms: u64,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            qualify_threshold: 85,
            max_steps: 10,
            max_profile_chars: 8000,
            eval_retries: 1,
            retry_base_delay_ms: 1000,
        }
    }
}

impl RunLimits {
    /// Calculate the delay for a given retry attempt using exponential backoff.
    /// delay = retry_base_delay_ms * 2^(attempt - 1)
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        self.retry_base_delay_ms * 2u64.pow(attempt.saturating_sub(1))
    }
}

/// One candidate profile and whatever the screening pass learned about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Zero-based position in the submitted batch.
    pub id: usize,
    pub raw_text: String,
    pub score: Option<u8>,
    pub rationale: Option<String>,
}

impl CandidateRecord {
    pub fn new(id: usize, raw_text: String) -> Self {
        Self {
            id,
            raw_text,
            score: None,
            rationale: None,
        }
    }

    /// Leading slice of the profile, cut at a char boundary.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        clip_chars(&self.raw_text, max_chars)
    }
}

/// Outreach email produced by the drafting step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachDraft {
    pub subject: String,
    pub body: String,
    /// Contact address extracted from the job description, when one exists.
    pub to: Option<String>,
}

/// The full, serializable record of one screening run.
///
/// Every field the supervisor consults lives here, so a run can be parked at
/// the approval gate, stored, and picked up later without re-running any step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub id: String,
    pub job_description: String,
    pub candidates: Vec<CandidateRecord>,
    /// Candidates whose score cleared the threshold, in submission order.
    pub qualified_matches: Vec<CandidateRecord>,
    pub outreach_draft: Option<OutreachDraft>,
    pub approval_status: ApprovalStatus,
    pub send_status: SendStatus,
    /// Routing decisions made so far, bounded by `limits.max_steps`.
    pub step_count: u32,
    pub last_step: StepKind,
    pub status: RunStatus,
    pub termination: Option<Termination>,
    pub phase_history: Vec<Phase>,
    /// Note left behind when the scoring oracle failed and the run degraded.
    pub evaluation_error: Option<String>,
    pub limits: RunLimits,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowState {
    pub fn new(job_description: String, profiles: Vec<String>, limits: RunLimits) -> Self {
        let now = Utc::now();
        let candidates = profiles
            .into_iter()
            .enumerate()
            .map(|(id, text)| {
                CandidateRecord::new(id, normalize_profile(&text, limits.max_profile_chars))
            })
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            job_description,
            candidates,
            qualified_matches: Vec::new(),
            outreach_draft: None,
            approval_status: ApprovalStatus::NotRequested,
            send_status: SendStatus::NotSent,
            step_count: 0,
            last_step: StepKind::None,
            status: RunStatus::Pending,
            termination: None,
            phase_history: vec![Phase::Start],
            evaluation_error: None,
            limits,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Park the run at the approval gate.
    pub fn suspend(&mut self) {
        self.approval_status = ApprovalStatus::Pending;
        self.status = RunStatus::Suspended;
        self.touch();
    }

    pub fn finish(&mut self, reason: DoneReason) {
        self.status = RunStatus::Done;
        self.termination = Some(Termination::Done(reason));
        self.touch();
    }

    pub fn abort(&mut self, reason: AbortReason) {
        self.status = RunStatus::Aborted;
        self.termination = Some(Termination::Aborted(reason));
        self.touch();
    }

    /// Record a reviewer decision on a parked run.
    ///
    /// Valid exactly once: the run must be suspended at the gate with a draft
    /// in hand. Anything else leaves the record untouched and reports an
    /// invalid transition.
    pub fn apply_decision(&mut self, decision: ApprovalDecision) -> Result<(), SiftError> {
        if self.status != RunStatus::Suspended
            || self.approval_status != ApprovalStatus::Pending
            || self.outreach_draft.is_none()
        {
            return Err(SiftError::InvalidTransition(format!(
                "run {} is not awaiting an approval decision (status: {}, approval: {})",
                self.id, self.status, self.approval_status
            )));
        }

        self.approval_status = match decision {
            ApprovalDecision::Approved => ApprovalStatus::Approved,
            ApprovalDecision::Rejected => ApprovalStatus::Rejected,
        };
        self.last_step = StepKind::Approve;
        self.status = RunStatus::InProgress;
        self.touch();
        Ok(())
    }

    /// The phase the run currently sits in.
    pub fn phase(&self) -> Phase {
        self.phase_history.last().copied().unwrap_or(Phase::Start)
    }
}

/// Structured summary of a run, produced for reporting at any point in its
/// lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub status: RunStatus,
    pub phase: Phase,
    pub reason: String,
    pub total_candidates: usize,
    pub qualified_matches: Vec<CandidateRecord>,
    pub outreach_draft: Option<OutreachDraft>,
    pub approval_status: ApprovalStatus,
    pub send_status: SendStatus,
    pub last_step: StepKind,
    pub step_count: u32,
    pub max_steps: u32,
    pub phase_history: Vec<Phase>,
    pub evaluation_error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub reported_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl RunReport {
    pub fn from_state(state: &WorkflowState) -> Self {
        let now = Utc::now();
        let duration = now - state.created_at;
        let reason = match &state.termination {
            Some(t) => t.reason(),
            None if state.status == RunStatus::Suspended => "awaiting approval".to_string(),
            None => "in progress".to_string(),
        };

        Self {
            run_id: state.id.clone(),
            status: state.status,
            phase: state.phase(),
            reason,
            total_candidates: state.candidates.len(),
            qualified_matches: state.qualified_matches.clone(),
            outreach_draft: state.outreach_draft.clone(),
            approval_status: state.approval_status,
            send_status: state.send_status.clone(),
            last_step: state.last_step,
            step_count: state.step_count,
            max_steps: state.limits.max_steps,
            phase_history: state.phase_history.clone(),
            evaluation_error: state.evaluation_error.clone(),
            started_at: state.created_at,
            reported_at: now,
            duration_ms: duration.num_milliseconds(),
        }
    }
}

/// Cut `text` to at most `max_chars` characters without splitting a char.
pub(crate) fn clip_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Sanitize raw resume text before it can reach a prompt: collapse space and
/// tab runs to one space, cap blank-line runs at one blank line, drop control
/// characters (CRLF becomes LF as a side effect), trim both ends, then cap
/// the result at `max_chars`.
pub(crate) fn normalize_profile(text: &str, max_chars: usize) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut pending_space = false;
    let mut pending_newlines = 0u32;

    for c in text.chars() {
        match c {
            ' ' | '\t' => pending_space = true,
            '\n' => {
                pending_newlines += 1;
                pending_space = false;
            }
            c if c.is_control() => {}
            c => {
                // Whitespace is flushed lazily, so leading and trailing runs
                // never land in the output.
                if !cleaned.is_empty() {
                    if pending_newlines > 0 {
                        cleaned.push('\n');
                        if pending_newlines > 1 {
                            cleaned.push('\n');
                        }
                    } else if pending_space {
                        cleaned.push(' ');
                    }
                }
                pending_newlines = 0;
                pending_space = false;
                cleaned.push(c);
            }
        }
    }

    cap_at_line_boundary(&cleaned, max_chars).to_string()
}

/// Cut to at most `max_chars` characters, stepping back to the last line
/// break in range so the cut never splits a line unless that line alone
/// exceeds the cap.
fn cap_at_line_boundary(text: &str, max_chars: usize) -> &str {
    let clipped = clip_chars(text, max_chars);
    if clipped.len() == text.len() {
        return clipped;
    }
    match clipped.rfind('\n') {
        Some(cut) if cut > 0 => &clipped[..cut],
        _ => clipped,
    }
}
