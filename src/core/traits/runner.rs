use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
    pub execution_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("program exited with status {}", result.status)]
    Crash { result: RunResult },
    #[error("program timed out after {timeout_ms} ms")]
    TimedOut { stdout: String, timeout_ms: u64 },
    #[error("failed to launch program: {msg}")]
    FailedToLaunch { msg: String },
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait Runner: std::fmt::Debug + Send + Sync {
    async fn run(
        &self,
        entry_point: &str,
        workspace_dir: &Path,
        timeout: Duration,
    ) -> Result<RunResult, RunError>;
}
