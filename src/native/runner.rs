use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

use crate::core::traits::runner::{RunError, RunResult, Runner};
use crate::native::process::{ProcessError, run_with_timeout};

#[derive(Clone, Debug)]
pub struct JavaRunner {
    java_path: PathBuf,
}

impl JavaRunner {
    pub fn new<T: AsRef<Path>>(java_path: T) -> Self {
        JavaRunner {
            java_path: java_path.as_ref().into(),
        }
    }
}

#[async_trait::async_trait]
impl Runner for JavaRunner {
    #[tracing::instrument(skip(self))]
    async fn run(
        &self,
        entry_point: &str,
        workspace_dir: &Path,
        timeout: Duration,
    ) -> Result<RunResult, RunError> {
        let mut cmd = Command::new(&self.java_path);
        cmd.arg("-cp")
            .arg(workspace_dir)
            .arg(entry_point)
            .current_dir(workspace_dir);

        let finished = match run_with_timeout(cmd, timeout).await {
            Ok(finished) => finished,
            Err(ProcessError::TimedOut { limit, stdout, .. }) => {
                return Err(RunError::TimedOut {
                    stdout,
                    timeout_ms: limit.as_millis() as u64,
                });
            }
            Err(e) => return Err(RunError::FailedToLaunch { msg: e.to_string() }),
        };

        let status = finished.output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&finished.output.stdout)
            .trim()
            .to_string();
        let stderr = String::from_utf8_lossy(&finished.output.stderr).to_string();

        tracing::debug!(status, elapsed_ms = finished.elapsed_ms, "program finished");

        if finished.output.status.success() {
            return Ok(RunResult {
                status,
                stdout,
                stderr,
                execution_time_ms: finished.elapsed_ms,
            });
        }

        let stderr = if stderr.trim().is_empty() {
            format!("Execution failed with code {}", status)
        } else {
            stderr
        };

        Err(RunError::Crash {
            result: RunResult {
                status,
                stdout,
                stderr,
                execution_time_ms: finished.elapsed_ms,
            },
        })
    }
}
