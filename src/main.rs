use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;

use sift::cli::{Cli, Command, DecisionArg};
use sift::config::SiftConfig;
use sift::demo;
use sift::engine::{Screener, WorkflowEngine};
use sift::groq::{ChatSender, GroqClient};
use sift::profiles;
use sift::sender::DryRunTransport;
use sift::store::RunStore;
use sift::ui::{self, RunProgress};
use sift::workflow::{ApprovalDecision, RunStatus};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SiftConfig::load()?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(threshold) = cli.threshold {
        config.qualify_threshold = threshold;
    }
    if let Some(max_steps) = cli.max_steps {
        config.max_steps = max_steps;
    }
    if cli.llm_routing {
        config.llm_routing = true;
    }

    match cli.command {
        Command::Screen {
            jd,
            resumes,
            decision,
        } => run_screen(&config, &jd, &resumes, decision, cli.verbose).await,
        Command::Demo { generate, count } => {
            run_demo(&config, generate, count, cli.verbose).await
        }
    }
}

async fn run_screen(
    config: &SiftConfig,
    jd_path: &str,
    resume_paths: &[String],
    decision: Option<DecisionArg>,
    verbose: bool,
) -> Result<()> {
    let job_description = std::fs::read_to_string(jd_path)
        .map_err(|e| anyhow::anyhow!("Failed to read job description {jd_path}: {e}"))?;
    let profiles = profiles::load_profiles(resume_paths)?;

    let oracle = api_client(config);
    if oracle.is_none() {
        eprintln!("  ⚠ No API key configured; scoring will degrade to no matches");
    }

    drive(oracle, config, job_description, profiles, decision, verbose).await
}

async fn run_demo(
    config: &SiftConfig,
    generate: Option<String>,
    count: u8,
    verbose: bool,
) -> Result<()> {
    if let Some(description) = generate {
        let Some(client) = api_client(config) else {
            bail!("generating synthetic resumes requires a Groq API key");
        };
        let profiles =
            profiles::generate_profiles(&client, &config.model, &description, count).await?;
        return drive(
            Some(client),
            config,
            demo::SAMPLE_JD.to_string(),
            profiles,
            None,
            verbose,
        )
        .await;
    }

    match api_client(config) {
        Some(client) => {
            drive(
                Some(client),
                config,
                demo::SAMPLE_JD.to_string(),
                demo::sample_profiles(),
                None,
                verbose,
            )
            .await
        }
        None => {
            eprintln!("  ⚠ No API key configured; running the demo on the scripted oracle");
            drive(
                Some(demo::ScriptedOracle),
                config,
                demo::SAMPLE_JD.to_string(),
                demo::sample_profiles(),
                None,
                verbose,
            )
            .await
        }
    }
}

fn api_client(config: &SiftConfig) -> Option<GroqClient> {
    if config.api_key.is_empty() {
        return None;
    }
    Some(
        GroqClient::new(config.api_key.clone())
            .with_timeout(Duration::from_secs(config.request_timeout_secs)),
    )
}

/// Carry one run from intake to its terminal report, stopping at the
/// approval gate for a decision when the supervisor parks it.
async fn drive<C: ChatSender>(
    oracle: Option<C>,
    config: &SiftConfig,
    job_description: String,
    profiles: Vec<String>,
    decision: Option<DecisionArg>,
    verbose: bool,
) -> Result<()> {
    let engine = WorkflowEngine::new(oracle, DryRunTransport, &config.model)
        .with_llm_routing(config.llm_routing);
    let screener = Screener::new(engine, Arc::new(RunStore::new()), config.limits());

    let progress = RunProgress::start(&format!("screening {} candidate(s)", profiles.len()));
    let mut report = screener.start(job_description, profiles).await;
    progress.complete(&report);

    if report.status == RunStatus::Suspended {
        if verbose {
            progress.print_report(&report);
        }
        if let Some(draft) = &report.outreach_draft {
            progress.print_draft(draft);
        }
        let verdict: ApprovalDecision = match decision {
            Some(arg) => arg.into(),
            None => ui::prompt_decision()?,
        };
        report = screener.resume(&report.run_id, verdict).await?;
        progress.complete(&report);
    }

    progress.print_report(&report);

    if report.status == RunStatus::Aborted {
        bail!("{}", report.reason);
    }
    Ok(())
}
