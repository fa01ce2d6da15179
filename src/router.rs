use anyhow::anyhow;

use crate::groq::{strip_json_fences, ChatMessage, ChatRequest, ChatSender};
use crate::prompts;
use crate::workflow::{RouteLabel, StepKind, WorkflowState};

/// Routing hint returned by the model.
#[derive(Debug, serde::Deserialize)]
struct HintReply {
    next: String,
}

/// Ask the model where it would route the run next.
///
/// Purely advisory: the supervisor's rule table is consulted regardless and
/// always wins. A hint that fails to arrive, parse, or name a known step is
/// dropped by the caller.
pub async fn route_hint(
    client: &impl ChatSender,
    model: &str,
    state: &WorkflowState,
) -> anyhow::Result<RouteLabel> {
    let prompt = prompts::routing_prompt(
        !matches!(state.last_step, StepKind::None),
        state.qualified_matches.len(),
        state.outreach_draft.is_some(),
        &state.approval_status.to_string(),
        &state.send_status.to_string(),
    );
    let req = ChatRequest::new(
        model,
        vec![
            ChatMessage::system(prompts::ROUTING_SYSTEM),
            ChatMessage::user(prompt),
        ],
    )
    .with_max_tokens(64);

    let response = client.send_chat(&req).await?;
    let text = response.text().map(str::trim).unwrap_or_default();

    let reply: HintReply = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| anyhow!("failed to parse routing hint: {e}"))?;

    RouteLabel::parse(&reply.next)
        .ok_or_else(|| anyhow!("routing hint named an unknown step: {}", reply.next))
}
