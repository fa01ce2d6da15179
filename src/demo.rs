//! Built-in demonstration batch.
//!
//! Ships a job description and three resumes so the whole workflow can run
//! without any files on disk, plus [`ScriptedOracle`], a stand-in for the
//! API that answers each pipeline prompt from a fixed script. The batch is
//! tuned so exactly one candidate clears the default threshold.

use crate::groq::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChatSender, ChatUsage, OracleError,
};

pub const SAMPLE_JD: &str = "\
# Senior Rust Engineer — NovaByte Systems

NovaByte builds a distributed event-streaming platform used by fintech
customers across Latin America. We are hiring a senior engineer for the
core broker team.

## Requirements
- 5+ years of systems programming, at least 3 in Rust
- Production experience with async runtimes (tokio preferred)
- Strong grasp of network protocols and storage engines
- Experience operating services on Linux

## Nice to have
- Kafka or similar log-based systems
- Contributions to open-source infrastructure

Applications and inquiries: hiring@novabyte.io
";

const SAMPLE_PROFILES: [&str; 3] = [
    "\
# Marina Duarte
Systems engineer, 9 years of experience, the last 6 writing Rust.

- Core maintainer of an internal message broker handling 40k events/s,
  built on tokio and io_uring
- Designed a tiered storage engine with crash-safe WAL replay
- Previously shipped C++ trading infrastructure at a market maker
- Open-source: patches merged into tokio-util and rdkafka

Linux since forever. Comfortable owning services end to end.
",
    "\
# Rafael Lima
Backend engineer, 7 years, mostly Go with two recent years of Rust.

- Built payment reconciliation services in Go (gRPC, Postgres)
- Rewrote a rate limiter in Rust with tokio; in production for a year
- Solid Linux operations background, on-call rotation lead
- No storage-engine experience; curious about event streaming
",
    "\
# Paula Mendes
Frontend developer, 5 years.

- React and TypeScript product work at two startups
- Some Node.js API experience
- Built a hobby CLI in Rust last year (a todo manager)
- Looking to move closer to design systems work
",
];

const SCRIPTED_SCORES: &str = r#"[
  {"score": 92, "rationale": "Strengths: six years of production Rust, tokio-based broker work and storage-engine design map directly onto the core requirements. Gaps: none significant."},
  {"score": 81, "rationale": "Strengths: solid backend and Linux operations background with real tokio exposure. Gaps: only two years of Rust and no storage-engine experience."},
  {"score": 45, "rationale": "Strengths: capable product engineer. Gaps: frontend focus; a hobby CLI does not cover the systems requirements."}
]"#;

const SCRIPTED_DRAFT: &str = r#"{
  "subject": "Senior Rust Engineer at NovaByte: 1 strong match",
  "body": "Dear Recruiter,\n\nOne candidate from the screened batch stands out for the core broker team.\n\nMarina Duarte (screened 92/100) brings six years of production Rust on top of nine in systems engineering. She maintains a tokio-based internal message broker handling 40k events/s and designed a tiered storage engine with crash-safe WAL replay, which lines up with the platform work described in the opening. Her open-source patches to tokio-util and rdkafka speak to the nice-to-have column as well.\n\nHappy to share the full screening rationale on request.\n\nBest regards,\nTalent Partnerships"
}"#;

const SCRIPTED_HINT: &str = r#"{"next": "evaluate"}"#;

/// The embedded candidate batch, one resume per entry.
pub fn sample_profiles() -> Vec<String> {
    SAMPLE_PROFILES.iter().map(|s| s.to_string()).collect()
}

/// Answers pipeline prompts from a fixed script, keyed on the prompt
/// markers each step embeds. Lets the demo run without an API key.
pub struct ScriptedOracle;

impl ChatSender for ScriptedOracle {
    async fn send_chat(&self, req: &ChatRequest) -> Result<ChatResponse, OracleError> {
        let prompt = req
            .messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or("");

        let text = if prompt.contains("SCORING PROTOCOL") {
            SCRIPTED_SCORES
        } else if prompt.contains("CANDIDATE SUMMARIES") {
            SCRIPTED_DRAFT
        } else if prompt.contains("CURRENT PIPELINE STATUS") {
            SCRIPTED_HINT
        } else {
            return Err(OracleError::EmptyCompletion);
        };

        Ok(ChatResponse {
            id: "scripted".into(),
            model: req.model.clone(),
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage {
                    role: "assistant".into(),
                    content: text.into(),
                },
                finish_reason: Some("stop".into()),
            }],
            usage: ChatUsage {
                prompt_tokens: 0,
                completion_tokens: 0,
                total_tokens: 0,
            },
        })
    }
}
