//! sift — supervisor-driven candidate screening and outreach.
//!
//! A rule-table supervisor routes each run through batch scoring, grounded
//! outreach drafting, a human approval gate and a single send attempt. The
//! binary wires the CLI to [`Screener`]; everything is exposed here so
//! integration tests and other callers can drive the workflow directly.

pub mod cli;
pub mod config;
pub mod demo;
pub mod drafter;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod groq;
pub mod profiles;
pub mod prompts;
pub mod router;
pub mod sender;
pub mod store;
pub mod ui;
pub mod workflow;

pub use engine::{Screener, WorkflowEngine};
pub use error::SiftError;
pub use store::RunStore;
