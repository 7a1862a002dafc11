use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("compilation failed: {diagnostics}")]
    CompilationFailed { diagnostics: String },
    #[error("compilation timed out after {timeout_ms} ms")]
    TimedOut { timeout_ms: u64 },
    #[error("internal compiler error: {msg}")]
    Internal { msg: String },
}

impl CompileError {
    /// Text shown to the student as `compilationError`.
    pub fn diagnostics(&self) -> String {
        match self {
            CompileError::CompilationFailed { diagnostics } => diagnostics.clone(),
            CompileError::TimedOut { timeout_ms } => {
                format!("Compilation timed out after {} ms", timeout_ms)
            }
            CompileError::Internal { msg } => msg.clone(),
        }
    }
}

/// Turns every file of a workspace into class files in a single invocation,
/// so the harness and the student's class resolve each other.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Compiler: std::fmt::Debug + Send + Sync {
    async fn compile(
        &self,
        files: &[PathBuf],
        workspace_dir: &Path,
        timeout: Duration,
    ) -> Result<(), CompileError>;
}
