use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TIMEOUT_MS;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSubmission {
    pub source_code: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl CodeSubmission {
    pub fn new(source_code: &str) -> Self {
        Self {
            source_code: source_code.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout(self, timeout_ms: u64) -> Self {
        Self { timeout_ms, ..self }
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// The one shape every execution path returns, real or simulated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilation_error: Option<String>,
    pub execution_time_ms: u64,
}

impl ExecutionResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn timed(self, execution_time_ms: u64) -> Self {
        Self {
            execution_time_ms,
            ..self
        }
    }
}

/// Driver program registered for one mission step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissionTestScenario {
    pub target_class_hint: &'static str,
    pub harness_source: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScenarioKey {
    pub mission_id: &'static str,
    pub step_id: u32,
}

/// Orchestrator state machine. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionState {
    Validating,
    Probing,
    Simulating,
    Compiling,
    Running,
    Cleanup,
    Done,
}
