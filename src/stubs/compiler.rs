use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::core::traits::compiler::{CompileError, Compiler};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileCall {
    pub file_names: Vec<String>,
    pub workspace_dir: PathBuf,
    pub timeout: Duration,
}

/// Compiler that waits `delay`, records the call and returns a fixed result.
#[derive(Debug)]
pub struct CompilerStub {
    result: Result<(), CompileError>,
    delay: Duration,
    calls: Mutex<Vec<CompileCall>>,
}

impl CompilerStub {
    pub fn new(result: Result<(), CompileError>, delay: Duration) -> Self {
        Self {
            result,
            delay,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CompileCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Compiler for CompilerStub {
    #[tracing::instrument]
    async fn compile(
        &self,
        files: &[PathBuf],
        workspace_dir: &Path,
        timeout: Duration,
    ) -> Result<(), CompileError> {
        tracing::debug!("Start compilation");
        self.calls.lock().unwrap().push(CompileCall {
            file_names: files
                .iter()
                .filter_map(|f| f.file_name())
                .map(|f| f.to_string_lossy().to_string())
                .collect(),
            workspace_dir: workspace_dir.to_path_buf(),
            timeout,
        });
        tokio::time::sleep(self.delay).await;
        tracing::debug!("Compilation result: {:?}", self.result);

        self.result.clone()
    }
}
