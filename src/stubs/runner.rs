use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use crate::constants::JAVA_EXTENSION;
use crate::core::traits::runner::{RunError, RunResult, Runner};

#[derive(Clone, Debug)]
pub enum RunnerBehavior {
    Fixed(Result<RunResult, RunError>),
    /// Prints every source file of the workspace, so a caller can tell which
    /// workspace it actually ran in.
    EchoWorkspace,
    Panic,
}

#[derive(Debug)]
pub struct RunnerStub {
    behavior: RunnerBehavior,
    delay: Duration,
    entry_points: Mutex<Vec<(String, Duration)>>,
}

impl RunnerStub {
    pub fn new(behavior: RunnerBehavior, delay: Duration) -> Self {
        Self {
            behavior,
            delay,
            entry_points: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Duration)> {
        self.entry_points.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Runner for RunnerStub {
    #[tracing::instrument]
    async fn run(
        &self,
        entry_point: &str,
        workspace_dir: &Path,
        timeout: Duration,
    ) -> Result<RunResult, RunError> {
        self.entry_points
            .lock()
            .unwrap()
            .push((entry_point.to_string(), timeout));
        tokio::time::sleep(self.delay).await;

        match &self.behavior {
            RunnerBehavior::Fixed(result) => result.clone(),
            RunnerBehavior::EchoWorkspace => {
                let stdout = echo_sources(workspace_dir)
                    .await
                    .map_err(|e| RunError::FailedToLaunch { msg: e.to_string() })?;
                Ok(RunResult {
                    status: 0,
                    stdout,
                    stderr: String::new(),
                    execution_time_ms: self.delay.as_millis() as u64,
                })
            }
            RunnerBehavior::Panic => panic!("runner stub exploded"),
        }
    }
}

async fn echo_sources(dir: &Path) -> std::io::Result<String> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == JAVA_EXTENSION) {
            names.push(path);
        }
    }
    names.sort();

    let mut out = String::new();
    for path in names {
        out.push_str(&tokio::fs::read_to_string(&path).await?);
        out.push('\n');
    }
    Ok(out)
}
