//! Shared data model for dispatch runs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::HeraldError;

/// Outcome of a single channel send. Always returned as data so the
/// orchestrator can continue fan-out to the remaining channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ChannelOutcome {
    Success,
    Failure(String),
}

impl ChannelOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<Result<(), HeraldError>> for ChannelOutcome {
    fn from(result: Result<(), HeraldError>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(e) => Self::Failure(e.to_string()),
        }
    }
}

/// Result of one dispatch cycle. Created per run, never persisted —
/// used for logging and as the manual-trigger return value.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub theme: String,
    pub raw_response: String,
    pub cleaned_response: String,
    pub channel_results: BTreeMap<String, ChannelOutcome>,
    /// Wall time of the full run, including the agent call.
    pub elapsed_ms: u64,
}

impl DispatchReport {
    /// Conjunction of per-channel outcomes.
    pub fn all_succeeded(&self) -> bool {
        self.channel_results.values().all(ChannelOutcome::is_success)
    }
}
