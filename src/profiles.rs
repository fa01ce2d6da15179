//! Candidate profile intake.
//!
//! Profiles enter a run either as resume files read from disk or as a
//! synthetic batch generated by the model for demos and pipeline testing.

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};

use crate::groq::{ChatMessage, ChatRequest, ChatSender, strip_json_fences};
use crate::prompts;

/// Reads one candidate profile per path, in the order given.
///
/// Files are taken as-is; clipping happens at run intake so the stored
/// record and the prompt agree on what the model saw.
pub fn load_profiles(paths: &[impl AsRef<Path>]) -> Result<Vec<String>> {
    if paths.is_empty() {
        bail!("no resume files given");
    }

    let mut profiles = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read resume {}: {e}", path.display()))?;
        if text.trim().is_empty() {
            bail!("resume file {} is empty", path.display());
        }
        profiles.push(text);
    }

    Ok(profiles)
}

/// Asks the model for a batch of synthetic resumes matching a description.
///
/// The reply must be a JSON array of strings, one resume per element.
pub async fn generate_profiles(
    client: &impl ChatSender,
    model: &str,
    description: &str,
    count: u8,
) -> Result<Vec<String>> {
    let request = ChatRequest::new(
        model,
        vec![
            ChatMessage::system(prompts::PROFILE_SYSTEM),
            ChatMessage::user(prompts::profile_generation_prompt(description, count)),
        ],
    )
    .with_max_tokens(8192);

    let response = client.send_chat(&request).await?;
    let Some(text) = response.text() else {
        bail!("model returned an empty completion");
    };

    let profiles: Vec<String> = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| anyhow::anyhow!("Failed to parse generated profiles: {e}"))?;

    if profiles.is_empty() {
        bail!("model returned an empty profile list");
    }

    Ok(profiles)
}
