pub mod config;
pub mod constants;
pub mod core;
pub mod native;
pub mod orchestrator;
pub mod scenarios;
pub mod simulation;
pub mod validation;
pub mod verdict;

#[cfg(test)]
mod integration_test;
#[cfg(test)]
mod stubs;

pub use crate::config::EngineConfig;
pub use crate::core::domain::{CodeSubmission, ExecutionResult, MissionTestScenario};
pub use crate::orchestrator::Orchestrator;
pub use crate::verdict::Verdict;
