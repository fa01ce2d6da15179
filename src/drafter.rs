use serde::Deserialize;
use thiserror::Error;

use crate::groq::{strip_json_fences, ChatMessage, ChatRequest, ChatSender, OracleError};
use crate::prompts;
use crate::workflow::{CandidateRecord, OutreachDraft, WorkflowState};

/// How much of each qualified profile is quoted into the drafting prompt.
const EXCERPT_CHARS: usize = 400;

/// Ways the drafting step can fail. Any of these aborts the run: an outreach
/// email is never worth a second oracle round-trip or a guessed draft.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("drafting oracle unavailable: no API key configured")]
    OracleUnavailable,
    #[error("drafting call failed: {0}")]
    Oracle(#[from] OracleError),
    #[error("malformed draft response: {0}")]
    Malformed(String),
    #[error("draft came back with an empty subject or body")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RawDraft {
    subject: String,
    body: String,
}

/// Generate the outreach email for the run's qualified matches and store it
/// on the run.
///
/// The prompt context is the job description plus, per match, an excerpt of
/// the profile with its score and rationale. Nothing else reaches the model,
/// so the draft cannot cite candidates who did not qualify.
pub async fn draft_outreach(
    client: &impl ChatSender,
    model: &str,
    state: &mut WorkflowState,
) -> Result<(), DraftError> {
    let summaries = format_summaries(&state.qualified_matches);
    let prompt = prompts::outreach_prompt(&state.job_description, &summaries);
    let req = ChatRequest::new(
        model,
        vec![
            ChatMessage::system(prompts::OUTREACH_SYSTEM),
            ChatMessage::user(prompt),
        ],
    );

    let response = client.send_chat(&req).await?;
    let text = response.text().ok_or(OracleError::EmptyCompletion)?;
    let raw: RawDraft = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| DraftError::Malformed(e.to_string()))?;

    let subject = raw.subject.trim();
    let body = raw.body.trim();
    if subject.is_empty() || body.is_empty() {
        return Err(DraftError::Empty);
    }

    state.outreach_draft = Some(OutreachDraft {
        subject: subject.to_string(),
        body: body.to_string(),
        to: extract_contact_email(&state.job_description),
    });
    Ok(())
}

fn format_summaries(matches: &[CandidateRecord]) -> String {
    matches
        .iter()
        .map(|c| {
            format!(
                "- Candidate {} (score {}/100): {}\n  Excerpt: {}",
                c.id + 1,
                c.score.unwrap_or(0),
                c.rationale.as_deref().unwrap_or("no rationale recorded"),
                c.excerpt(EXCERPT_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find the first well-formed email address in `text`.
///
/// A plain scanner, not a full RFC parser: it anchors on `@`, walks the local
/// part left and the domain right, trims sentence punctuation, and requires a
/// dotted domain with an alphabetic TLD of at least two chars.
pub fn extract_contact_email(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'@' {
            continue;
        }

        let mut start = i;
        while start > 0 && is_local_byte(bytes[start - 1]) {
            start -= 1;
        }
        // Leading dots belong to the surrounding sentence, not the address.
        while start < i && bytes[start] == b'.' {
            start += 1;
        }

        let mut end = i + 1;
        while end < bytes.len() && is_domain_byte(bytes[end]) {
            end += 1;
        }
        // Same for trailing punctuation after the domain.
        while end > i + 1 && matches!(bytes[end - 1], b'.' | b'-') {
            end -= 1;
        }

        if start == i || end == i + 1 {
            continue;
        }
        if bytes[i - 1] == b'.' {
            continue;
        }
        if domain_is_well_formed(&text[i + 1..end]) {
            return Some(text[start..end].to_string());
        }
    }
    None
}

fn is_local_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'%' | b'+' | b'-')
}

fn is_domain_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-')
}

fn domain_is_well_formed(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    for label in &labels {
        if label.is_empty() || label.starts_with('-') || label.ends_with('-') {
            return false;
        }
        if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return false;
        }
    }
    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::groq::{ChatChoice, ChatResponse, ChatUsage};
    use crate::workflow::RunLimits;

    struct MockClient {
        response: Result<String, OracleError>,
        seen_prompts: Mutex<Vec<String>>,
    }

    impl MockClient {
        fn ok(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                seen_prompts: Mutex::new(Vec::new()),
            }
        }

        fn err(e: OracleError) -> Self {
            Self {
                response: Err(e),
                seen_prompts: Mutex::new(Vec::new()),
            }
        }

        fn last_prompt(&self) -> String {
            self.seen_prompts
                .lock()
                .unwrap()
                .last()
                .cloned()
                .unwrap_or_default()
        }
    }

    impl ChatSender for MockClient {
        async fn send_chat(&self, req: &ChatRequest) -> Result<ChatResponse, OracleError> {
            if let Some(user) = req.messages.iter().find(|m| m.role == "user") {
                self.seen_prompts.lock().unwrap().push(user.content.clone());
            }
            match &self.response {
                Ok(text) => Ok(ChatResponse {
                    id: "mock".into(),
                    model: "mock".into(),
                    choices: vec![ChatChoice {
                        index: 0,
                        message: ChatMessage {
                            role: "assistant".into(),
                            content: text.clone(),
                        },
                        finish_reason: Some("stop".into()),
                    }],
                    usage: ChatUsage {
                        prompt_tokens: 0,
                        completion_tokens: 0,
                        total_tokens: 0,
                    },
                }),
                Err(_) => Err(OracleError::Api {
                    status: 500,
                    message: "mock error".to_string(),
                }),
            }
        }
    }

    fn make_state() -> WorkflowState {
        let mut state = WorkflowState::new(
            "Senior Rust Engineer at Acme. Applications: hiring@acme.dev".into(),
            vec![
                "Alice Moreira, ten years of Rust and distributed systems".into(),
                "Bruno Costa, frontend designer".into(),
            ],
            RunLimits::default(),
        );
        state.candidates[0].score = Some(93);
        state.candidates[0].rationale = Some("Strengths: deep systems background".into());
        state.candidates[1].score = Some(30);
        state.candidates[1].rationale = Some("Gaps: no backend experience".into());
        state.qualified_matches = vec![state.candidates[0].clone()];
        state
    }

    #[tokio::test]
    async fn draft_is_stored_with_extracted_contact() {
        let client = MockClient::ok(
            r#"{"subject": "Candidates for Senior Rust Engineer", "body": "Dear Recruiter,\n..."}"#,
        );
        let mut state = make_state();

        draft_outreach(&client, "mock-model", &mut state)
            .await
            .unwrap();

        let draft = state.outreach_draft.unwrap();
        assert_eq!(draft.subject, "Candidates for Senior Rust Engineer");
        assert!(draft.body.starts_with("Dear Recruiter,"));
        assert_eq!(draft.to.as_deref(), Some("hiring@acme.dev"));
    }

    #[tokio::test]
    async fn prompt_carries_only_qualified_material() {
        let client = MockClient::ok(r#"{"subject": "s", "body": "b"}"#);
        let mut state = make_state();

        draft_outreach(&client, "mock-model", &mut state)
            .await
            .unwrap();

        let prompt = client.last_prompt();
        assert!(prompt.contains("Senior Rust Engineer at Acme"));
        assert!(prompt.contains("score 93/100"));
        assert!(prompt.contains("Strengths: deep systems background"));
        assert!(prompt.contains("Alice Moreira"));
        // The unqualified candidate must stay out of the drafting context.
        assert!(!prompt.contains("Bruno Costa"));
    }

    #[tokio::test]
    async fn fenced_draft_json_is_tolerated() {
        let client = MockClient::ok("```json\n{\"subject\": \"s\", \"body\": \"b\"}\n```");
        let mut state = make_state();

        draft_outreach(&client, "mock-model", &mut state)
            .await
            .unwrap();
        assert!(state.outreach_draft.is_some());
    }

    #[tokio::test]
    async fn malformed_draft_is_an_error() {
        let client = MockClient::ok("Subject: hi\n\nDear Recruiter,");
        let mut state = make_state();

        let err = draft_outreach(&client, "mock-model", &mut state)
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::Malformed(_)));
        assert!(state.outreach_draft.is_none());
    }

    #[tokio::test]
    async fn blank_fields_are_an_error() {
        let client = MockClient::ok(r#"{"subject": "  ", "body": "text"}"#);
        let mut state = make_state();

        let err = draft_outreach(&client, "mock-model", &mut state)
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::Empty));
    }

    #[tokio::test]
    async fn oracle_failure_propagates() {
        let client = MockClient::err(OracleError::Api {
            status: 500,
            message: "down".into(),
        });
        let mut state = make_state();

        let err = draft_outreach(&client, "mock-model", &mut state)
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::Oracle(_)));
    }

    #[test]
    fn finds_first_address() {
        assert_eq!(
            extract_contact_email("Send resumes to jobs@acme.io or hr@other.org"),
            Some("jobs@acme.io".into())
        );
    }

    #[test]
    fn trims_sentence_punctuation() {
        assert_eq!(
            extract_contact_email("Questions? Write to hr@acme.io."),
            Some("hr@acme.io".into())
        );
        assert_eq!(
            extract_contact_email("(contact: hr@acme.io)"),
            Some("hr@acme.io".into())
        );
    }

    #[test]
    fn accepts_tags_subdomains_and_hyphens() {
        assert_eq!(
            extract_contact_email("hiring+rust@acme.io"),
            Some("hiring+rust@acme.io".into())
        );
        assert_eq!(
            extract_contact_email("team@mail.acme.co.uk"),
            Some("team@mail.acme.co.uk".into())
        );
        assert_eq!(
            extract_contact_email("hr@acme-labs.io"),
            Some("hr@acme-labs.io".into())
        );
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert_eq!(extract_contact_email("no address here"), None);
        assert_eq!(extract_contact_email("stray @ sign"), None);
        assert_eq!(extract_contact_email("user@"), None);
        assert_eq!(extract_contact_email("@domain.com"), None);
        assert_eq!(extract_contact_email("user@localhost"), None);
        assert_eq!(extract_contact_email("user@domain.c"), None);
        assert_eq!(extract_contact_email("user@-bad.com"), None);
    }

    #[test]
    fn skips_invalid_then_finds_valid() {
        assert_eq!(
            extract_contact_email("ping me @here, or really at hr@acme.io"),
            Some("hr@acme.io".into())
        );
    }

    #[test]
    fn handles_multibyte_neighbors() {
        assert_eq!(
            extract_contact_email("candidaturas—hr@acme.io—até sexta"),
            Some("hr@acme.io".into())
        );
    }
}
