use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::Instant;

use crate::config::EngineConfig;
use crate::constants::{HARNESS_CLASS, JAVA_EXTENSION};
use crate::core::domain::{CodeSubmission, ExecutionResult, ExecutionState};
use crate::core::errors::EngineError;
use crate::core::traits::compiler::{CompileError, Compiler};
use crate::core::traits::runner::{RunError, Runner};
use crate::native::compiler::JavacCompiler;
use crate::native::probe::ToolchainProbe;
use crate::native::runner::JavaRunner;
use crate::native::workspace::{Workspace, WorkspaceManager};
use crate::{simulation, validation};

const GENERIC_ERROR: &str = "Internal error while executing the code";

#[derive(Clone, Copy, Debug)]
enum Job<'a> {
    Mission {
        student: &'a str,
        harness: &'a str,
        hint: &'a str,
    },
    Standalone {
        student: &'a str,
    },
}

impl Job<'_> {
    fn student(&self) -> &str {
        match self {
            Job::Mission { student, .. } | Job::Standalone { student } => student,
        }
    }
}

/// Sequences validation, toolchain detection, compilation, execution and
/// cleanup for one submission at a time. Cheap to clone; clones share the
/// compiler, runner and toolchain probe.
#[derive(Clone, Debug)]
pub struct Orchestrator {
    compiler: Arc<dyn Compiler>,
    runner: Arc<dyn Runner>,
    probe: Arc<ToolchainProbe>,
    workspaces: WorkspaceManager,
    default_timeout_ms: u64,
    force_simulation: bool,
}

impl Orchestrator {
    pub fn new(
        compiler: Arc<dyn Compiler>,
        runner: Arc<dyn Runner>,
        probe: Arc<ToolchainProbe>,
        workspaces: WorkspaceManager,
    ) -> Self {
        let defaults = EngineConfig::default();
        Self {
            compiler,
            runner,
            probe,
            workspaces,
            default_timeout_ms: defaults.default_timeout_ms,
            force_simulation: defaults.force_simulation,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            Arc::new(JavacCompiler::new(&config.javac_path)),
            Arc::new(JavaRunner::new(&config.java_path)),
            ToolchainProbe::shared(&config.javac_path),
            WorkspaceManager::new(&config.workspace_root),
        )
        .with_default_timeout(config.default_timeout_ms)
        .with_forced_simulation(config.force_simulation)
    }

    pub fn with_default_timeout(self, default_timeout_ms: u64) -> Self {
        Self {
            default_timeout_ms,
            ..self
        }
    }

    pub fn with_forced_simulation(self, force_simulation: bool) -> Self {
        Self {
            force_simulation,
            ..self
        }
    }

    /// Compiles the student's class together with `harness_source` and runs
    /// the harness, or grades the source heuristically when that is not
    /// possible. Never fails: every outcome is an `ExecutionResult`.
    #[tracing::instrument(skip(self, student_source, harness_source))]
    pub async fn execute_mission_code(
        &self,
        student_source: &str,
        harness_source: &str,
        target_class_hint: &str,
        timeout_ms: Option<u64>,
    ) -> ExecutionResult {
        let job = Job::Mission {
            student: student_source,
            harness: harness_source,
            hint: target_class_hint,
        };
        self.guarded(job, timeout_ms).await
    }

    /// Compiles and runs the student's own class through its `main` method.
    #[tracing::instrument(skip(self, student_source))]
    pub async fn execute_code(&self, student_source: &str, timeout_ms: Option<u64>) -> ExecutionResult {
        self.guarded(Job::Standalone { student: student_source }, timeout_ms)
            .await
    }

    pub async fn execute_submission(&self, submission: &CodeSubmission) -> ExecutionResult {
        self.execute_code(&submission.source_code, Some(submission.timeout_ms))
            .await
    }

    async fn guarded(&self, job: Job<'_>, timeout_ms: Option<u64>) -> ExecutionResult {
        let started = Instant::now();
        let timeout = Duration::from_millis(timeout_ms.unwrap_or(self.default_timeout_ms));

        let outcome = AssertUnwindSafe(self.execute(job, timeout))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => into_result(err),
            Err(_) => {
                tracing::error!("execution panicked, workspace released during unwind");
                ExecutionResult::failure(GENERIC_ERROR)
            }
        };

        enter(ExecutionState::Done);
        result.timed(started.elapsed().as_millis() as u64)
    }

    async fn execute(&self, job: Job<'_>, timeout: Duration) -> Result<ExecutionResult, EngineError> {
        enter(ExecutionState::Validating);
        let class_name = self.validate(job)?;

        enter(ExecutionState::Probing);
        let available = !self.force_simulation && self.probe.check_availability().await;

        match job {
            Job::Mission { student, hint, .. }
                if !available || simulation::is_structural_only(hint) =>
            {
                enter(ExecutionState::Simulating);
                return Ok(simulation::simulate(student, hint));
            }
            Job::Standalone { .. } if !available => return Err(EngineError::ToolchainUnavailable),
            _ => {}
        }

        enter(ExecutionState::Compiling);
        let mut workspace = self.workspaces.create().await?;
        let outcome = self
            .compile_and_run(&mut workspace, job, &class_name, timeout)
            .await;

        enter(ExecutionState::Cleanup);
        workspace.destroy().await;

        outcome
    }

    fn validate(&self, job: Job<'_>) -> Result<String, EngineError> {
        match job {
            Job::Mission { student, .. } => validation::validate(student)?,
            Job::Standalone { student } => validation::validate_standalone(student)?,
        }

        let class_name = validation::detect_public_class(job.student()).ok_or_else(|| {
            EngineError::StructuralError("Java code must contain a public class declaration".into())
        })?;

        if matches!(job, Job::Mission { .. }) && class_name == HARNESS_CLASS {
            return Err(EngineError::StructuralError(format!(
                "Class name '{}' is reserved for the test harness",
                HARNESS_CLASS
            )));
        }

        Ok(class_name)
    }

    async fn compile_and_run(
        &self,
        workspace: &mut Workspace,
        job: Job<'_>,
        class_name: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult, EngineError> {
        let student_file = workspace
            .write(&source_file(class_name), job.student())
            .await?;
        let mut files = vec![student_file];

        let entry_point = match job {
            Job::Mission { harness, .. } => {
                files.push(
                    workspace
                        .write(&source_file(HARNESS_CLASS), harness)
                        .await?,
                );
                HARNESS_CLASS
            }
            Job::Standalone { .. } => class_name,
        };

        self.compiler
            .compile(&files, workspace.dir(), timeout)
            .await
            .map_err(|e| match e {
                CompileError::Internal { msg } => EngineError::Unexpected(msg),
                other => EngineError::CompilationFailure {
                    diagnostics: other.diagnostics(),
                },
            })?;

        enter(ExecutionState::Running);
        match self.runner.run(entry_point, workspace.dir(), timeout).await {
            Ok(run) => Ok(ExecutionResult {
                success: true,
                output: run.stdout,
                ..Default::default()
            }),
            Err(RunError::Crash { result }) => Ok(ExecutionResult {
                success: false,
                output: result.stdout,
                error: Some(result.stderr),
                ..Default::default()
            }),
            Err(RunError::TimedOut { stdout, timeout_ms }) => Ok(ExecutionResult {
                success: false,
                output: stdout,
                error: Some(format!("Execution timed out after {} ms", timeout_ms)),
                ..Default::default()
            }),
            Err(RunError::FailedToLaunch { msg }) => Err(EngineError::ExecutionFailure(msg)),
        }
    }
}

fn source_file(class_name: &str) -> String {
    format!("{}.{}", class_name, JAVA_EXTENSION)
}

fn enter(state: ExecutionState) {
    tracing::debug!(?state, "execution state");
}

fn into_result(err: EngineError) -> ExecutionResult {
    match err {
        EngineError::CompilationFailure { diagnostics } => ExecutionResult {
            success: false,
            compilation_error: Some(diagnostics),
            error: Some("Compilation failed".to_string()),
            ..Default::default()
        },
        EngineError::Unexpected(_) | EngineError::Io(_) => {
            tracing::error!(error = %err, "unexpected execution failure");
            ExecutionResult::failure(GENERIC_ERROR)
        }
        EngineError::SecurityViolation { .. }
        | EngineError::StructuralError(_)
        | EngineError::ToolchainUnavailable
        | EngineError::ExecutionFailure(_) => ExecutionResult::failure(err.to_string()),
    }
}
