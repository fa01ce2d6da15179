use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::time::sleep;

use crate::groq::{strip_json_fences, ChatMessage, ChatRequest, ChatSender, OracleError};
use crate::prompts;
use crate::workflow::{CandidateRecord, WorkflowState};

/// Ways the screening step can fail after its retry budget is spent.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("scoring oracle unavailable: no API key configured")]
    OracleUnavailable,
    #[error("scoring call failed: {0}")]
    Oracle(#[from] OracleError),
    #[error("malformed screening response: {0}")]
    Malformed(String),
    #[error("screening response covered {got} candidates, expected {expected}")]
    LengthMismatch { expected: usize, got: usize },
}

/// One scored row in the model's reply, matched to candidates by position.
#[derive(Debug, Deserialize)]
struct RawScore {
    score: i64,
    #[serde(alias = "reasoning")]
    rationale: String,
}

/// Some models wrap the array in an object; accept that too.
#[derive(Debug, Deserialize)]
struct ScoreEnvelope {
    #[serde(alias = "results")]
    candidates: Vec<RawScore>,
}

/// Score the whole candidate batch in a single oracle call and record the
/// qualified matches on the run.
///
/// The call is retried per `limits.eval_retries` with exponential backoff
/// (honoring server-provided delays on rate limits). Once the budget is
/// spent the error surfaces to the caller; candidates keep whatever scores
/// they had, which for a fresh run is none.
pub async fn evaluate(
    client: &impl ChatSender,
    model: &str,
    state: &mut WorkflowState,
) -> Result<(), EvaluationError> {
    if state.candidates.is_empty() {
        state.qualified_matches.clear();
        return Ok(());
    }

    let profiles_block = format_profiles(&state.candidates);
    let prompt = prompts::screening_prompt(
        &state.job_description,
        &profiles_block,
        state.candidates.len(),
    );

    let mut attempt = 0u32;
    let rows = loop {
        match screen_once(client, model, &prompt, state.candidates.len()).await {
            Ok(rows) => break rows,
            Err(err) if attempt < state.limits.eval_retries => {
                attempt += 1;
                let delay_ms = match &err {
                    EvaluationError::Oracle(OracleError::RateLimited { retry_after_ms }) => {
                        *retry_after_ms
                    }
                    _ => state.limits.delay_for_attempt(attempt),
                };
                log_retry(attempt, state.limits.eval_retries, &err.to_string(), delay_ms);
                sleep(Duration::from_millis(delay_ms)).await;
            }
            Err(err) => return Err(err),
        }
    };

    for (candidate, row) in state.candidates.iter_mut().zip(rows) {
        candidate.score = Some(row.score.clamp(0, 100) as u8);
        candidate.rationale = Some(row.rationale);
    }

    let threshold = state.limits.qualify_threshold;
    state.qualified_matches = state
        .candidates
        .iter()
        .filter(|c| c.score.is_some_and(|s| s > threshold))
        .cloned()
        .collect();
    Ok(())
}

/// One scoring call: prompt, parse, verify coverage.
async fn screen_once(
    client: &impl ChatSender,
    model: &str,
    prompt: &str,
    expected: usize,
) -> Result<Vec<RawScore>, EvaluationError> {
    let req = ChatRequest::new(
        model,
        vec![
            ChatMessage::system(prompts::SCREENING_SYSTEM),
            ChatMessage::user(prompt),
        ],
    );
    let response = client.send_chat(&req).await?;
    let text = response.text().ok_or(OracleError::EmptyCompletion)?;

    let rows = parse_scores(text)?;
    if rows.len() != expected {
        return Err(EvaluationError::LengthMismatch {
            expected,
            got: rows.len(),
        });
    }
    Ok(rows)
}

fn parse_scores(text: &str) -> Result<Vec<RawScore>, EvaluationError> {
    let cleaned = strip_json_fences(text);
    match serde_json::from_str::<Vec<RawScore>>(cleaned) {
        Ok(rows) => Ok(rows),
        Err(array_err) => serde_json::from_str::<ScoreEnvelope>(cleaned)
            .map(|envelope| envelope.candidates)
            .map_err(|_| EvaluationError::Malformed(array_err.to_string())),
    }
}

/// Render the numbered profile blocks embedded in the screening prompt.
pub(crate) fn format_profiles(candidates: &[CandidateRecord]) -> String {
    candidates
        .iter()
        .map(|c| format!("--- Candidate {} ---\n{}", c.id + 1, c.raw_text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn log_retry(attempt: u32, max: u32, reason: &str, delay_ms: u64) {
    eprintln!("  ↻ Scoring retry {attempt}/{max}: {reason} (waiting {delay_ms}ms)");
}
