// All LLM prompt constants for the screening pipeline, plus the builders
// that fill in their placeholders.

/// System prompt for batch screening. Enforces JSON-only output.
pub const SCREENING_SYSTEM: &str =
    "You are a fair and objective technical hiring manager evaluating candidates. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Batch screening prompt template.
/// Replace: `{job_description}`, `{formatted_profiles}`, `{candidate_count}`
const SCREENING_PROMPT_TEMPLATE: &str = r#"EVALUATION MODE: Evaluate every candidate profile below against the Job Description (JD) in a single pass.

**JOB DESCRIPTION (JD)**:
{job_description}

**CANDIDATE PROFILES**:
{formatted_profiles}

**SCORING PROTOCOL**:
- **0-40 (Reject)**: Missing fundamental technical skills required for the role.
- **41-60 (Borderline)**: Has some relevant skills but lacks the required depth or experience level.
- **61-74 (Potential)**: Good alignment with most core skills; might need some ramp-up in specific areas.
- **75-89 (Strong Match)**: Strong alignment with core and secondary technical requirements. Solid evidence of impact.
- **90-100 (Expert Match)**: Perfect alignment with all requirements. Clear evidence of high-impact achievements and leadership.

**SCREENING CRITERIA**:
1. **Tech Stack Alignment**: How well do the candidate's skills map to the requirements in the JD?
2. **Experience Relevance**: Does the work history show progressively increasing responsibility?
3. **Evidence of Impact**: Look for quantifiable results and problem-solving examples.

For each candidate, in the exact order the profiles appear above, return one JSON object with:
- score: integer 0-100 (be fair but realistic)
- rationale: "Strengths: [key skills and achievements]" | "Gaps: [missing or weaker skills]"

Return ONLY a valid JSON array with exactly {candidate_count} objects, one per candidate, in submission order."#;

/// System prompt for outreach drafting. Enforces JSON-only output.
pub const OUTREACH_SYSTEM: &str =
    "You are a senior technical talent partner drafting recruiter outreach. \
    You MUST respond with valid JSON only — a single JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent facts not present in the provided summaries.";

/// Outreach drafting prompt template.
/// Replace: `{job_description}`, `{candidate_summaries}`
const OUTREACH_PROMPT_TEMPLATE: &str = r#"Draft a high-impact, persuasive email presenting the candidates below to the recruiter behind this opening.

**CONTEXT (JOB DESCRIPTION)**:
{job_description}

**CANDIDATE SUMMARIES**:
{candidate_summaries}

**STRICT GROUNDING RULES**:
1. **ROLE IDENTIFICATION**: Extract the EXACT job title from the provided Job Description. Do NOT generalize.
2. **ZERO HALLUCINATION**: Use ONLY information provided in the summaries. Do NOT invent skills, years of experience, or seniority.

**WRITING GUIDELINES**:
1. **Subject Line**: Must include the EXACT role title extracted from the JD.
2. **Greeting**: Use exactly "Dear Recruiter,".
3. **Body**: Highlight why each candidate's strengths align with the specific requirements of the role. Mention gaps professionally when present.
4. **Footer**: Sign off with "Best regards," followed by "Talent Partnerships".

Return ONLY a JSON object with this exact shape:
{"subject": "...", "body": "..."}"#;

/// System prompt for the routing hint. Enforces JSON-only output.
pub const ROUTING_SYSTEM: &str =
    "You are the routing supervisor for a candidate screening pipeline. \
    You MUST respond with valid JSON only — a single JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Routing hint prompt template.
/// Replace: `{has_evaluations}`, `{match_count}`, `{has_draft}`, `{approval}`,
///          `{send_status}`
const ROUTING_PROMPT_TEMPLATE: &str = r#"Decide the next step for the screening pipeline below.

**CURRENT PIPELINE STATUS**:
- Candidate evaluations performed: {has_evaluations}
- Qualified matches found: {match_count}
- Outreach draft generated: {has_draft}
- Reviewer approval: {approval}
- Outreach dispatch: {send_status}

**STEP DIRECTORY**:
1. **evaluate**: Use this if candidate profiles exist but have not been evaluated.
2. **draft**: Use this if evaluation is complete, qualified matches exist, and no draft has been generated.
3. **send**: Use this ONLY if an outreach draft exists AND reviewer approval is "approved".
4. **finish**: Use this if all tasks are complete, no matches were found, or approval was refused.

Return ONLY a JSON object naming the next step:
{"next": "evaluate" | "draft" | "send" | "finish"}"#;

/// System prompt for synthetic profile generation. Enforces JSON-only output.
pub const PROFILE_SYSTEM: &str =
    "You are a synthetic data generator specializing in high-fidelity HR data. \
    You MUST respond with valid JSON only — a JSON array of strings. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Synthetic profile generation prompt template.
/// Replace: `{generation_prompt}`, `{count}`
const PROFILE_PROMPT_TEMPLATE: &str = r#"Generate {count} realistic, highly detailed candidate profiles that read like authentic professional resumes, based SOLELY on the generation prompt below.

**USER GENERATION PROMPT**:
{generation_prompt}

**RESUME STRUCTURE REQUIREMENTS**:
1. **Header**: Full name, professional title, contact placeholders ([Email Address], [Phone Number], [Location]).
2. **Professional Summary**: 3-5 sentences covering years of experience and core expertise.
3. **Core Competencies**: At least 15 relevant skills, categorized with bold headings.
4. **Professional Experience**: Company, role, dates, 3-5 bullet points with quantifiable results.
5. **Education and Certifications**.

**STRICT GROUNDING RULES**:
- Do NOT use any job description information unless the generation prompt repeats it.
- Use professional, corporate language; vary company names, industries and candidate names.

Return ONLY a JSON array of {count} strings, where each string is a full candidate profile in markdown format."#;

/// Fill in the batch screening prompt for one run.
pub fn screening_prompt(
    job_description: &str,
    formatted_profiles: &str,
    candidate_count: usize,
) -> String {
    SCREENING_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{formatted_profiles}", formatted_profiles)
        .replace("{candidate_count}", &candidate_count.to_string())
}

/// Fill in the outreach drafting prompt for one run.
pub fn outreach_prompt(job_description: &str, candidate_summaries: &str) -> String {
    OUTREACH_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{candidate_summaries}", candidate_summaries)
}

/// Fill in the routing hint prompt from a snapshot of the run.
pub fn routing_prompt(
    has_evaluations: bool,
    match_count: usize,
    has_draft: bool,
    approval: &str,
    send_status: &str,
) -> String {
    ROUTING_PROMPT_TEMPLATE
        .replace("{has_evaluations}", yes_no(has_evaluations))
        .replace("{match_count}", &match_count.to_string())
        .replace("{has_draft}", yes_no(has_draft))
        .replace("{approval}", approval)
        .replace("{send_status}", send_status)
}

/// Fill in the synthetic profile generation prompt.
pub fn profile_generation_prompt(generation_prompt: &str, count: u8) -> String {
    PROFILE_PROMPT_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{generation_prompt}", generation_prompt)
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screening_prompt_fills_placeholders() {
        let prompt = screening_prompt("Rust engineer JD", "--- Candidate 1 ---\nprofile", 1);
        assert!(prompt.contains("Rust engineer JD"));
        assert!(prompt.contains("--- Candidate 1 ---"));
        assert!(prompt.contains("exactly 1 objects"));
        assert!(!prompt.contains("{job_description}"));
        assert!(!prompt.contains("{candidate_count}"));
    }

    #[test]
    fn screening_prompt_keeps_scoring_bands() {
        let prompt = screening_prompt("jd", "profiles", 3);
        assert!(prompt.contains("0-40 (Reject)"));
        assert!(prompt.contains("90-100 (Expert Match)"));
    }

    #[test]
    fn outreach_prompt_fills_placeholders() {
        let prompt = outreach_prompt("Senior ML Engineer at Nova", "- Candidate 1 (score 92)");
        assert!(prompt.contains("Senior ML Engineer at Nova"));
        assert!(prompt.contains("- Candidate 1 (score 92)"));
        assert!(prompt.contains(r#""Dear Recruiter,""#));
        assert!(prompt.contains(r#"{"subject": "...", "body": "..."}"#));
    }

    #[test]
    fn routing_prompt_renders_status_flags() {
        let prompt = routing_prompt(true, 2, false, "pending", "not sent");
        assert!(prompt.contains("Candidate evaluations performed: Yes"));
        assert!(prompt.contains("Qualified matches found: 2"));
        assert!(prompt.contains("Outreach draft generated: No"));
        assert!(prompt.contains("Reviewer approval: pending"));
    }

    #[test]
    fn profile_prompt_embeds_count() {
        let prompt = profile_generation_prompt("3 senior Rust engineers", 3);
        assert!(prompt.contains("Generate 3 realistic"));
        assert!(prompt.contains("3 senior Rust engineers"));
        assert!(prompt.contains("JSON array of 3 strings"));
    }
}
