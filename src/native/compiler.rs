use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

use crate::core::traits::compiler::{CompileError, Compiler};
use crate::native::process::{ProcessError, run_with_timeout};

#[derive(Clone, Debug)]
pub struct JavacCompiler {
    javac_path: PathBuf,
}

impl JavacCompiler {
    pub fn new<T: AsRef<Path>>(javac_path: T) -> Self {
        JavacCompiler {
            javac_path: javac_path.as_ref().into(),
        }
    }
}

#[async_trait::async_trait]
impl Compiler for JavacCompiler {
    #[tracing::instrument(skip(self))]
    async fn compile(
        &self,
        files: &[PathBuf],
        workspace_dir: &Path,
        timeout: Duration,
    ) -> Result<(), CompileError> {
        let mut cmd = Command::new(&self.javac_path);
        cmd.arg("-encoding")
            .arg("UTF-8")
            .arg("-d")
            .arg(workspace_dir)
            .args(files)
            .current_dir(workspace_dir);

        let finished = match run_with_timeout(cmd, timeout).await {
            Ok(finished) => finished,
            Err(ProcessError::Spawn(e)) => {
                return Err(CompileError::CompilationFailed {
                    diagnostics: e.to_string(),
                });
            }
            Err(ProcessError::TimedOut { limit, .. }) => {
                return Err(CompileError::TimedOut {
                    timeout_ms: limit.as_millis() as u64,
                });
            }
            Err(e @ ProcessError::Wait(_)) => {
                return Err(CompileError::Internal { msg: e.to_string() });
            }
        };

        tracing::debug!(elapsed_ms = finished.elapsed_ms, "javac finished");

        let output = finished.output;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let diagnostics = if !stderr.is_empty() {
            stderr
        } else if !stdout.is_empty() {
            stdout
        } else {
            format!(
                "Compilation failed with code {}",
                output.status.code().unwrap_or(-1)
            )
        };

        Err(CompileError::CompilationFailed { diagnostics })
    }
}
