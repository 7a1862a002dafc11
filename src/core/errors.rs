use thiserror::Error;

use crate::validation::ValidationError;

/// Everything that can stop an execution. The orchestrator converts each
/// variant into an `ExecutionResult`; none of them leave the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Blocked pattern detected: {pattern}")]
    SecurityViolation { pattern: String },

    #[error("{0}")]
    StructuralError(String),

    #[error("Java toolchain is not available on this host")]
    ToolchainUnavailable,

    #[error("Compilation failed")]
    CompilationFailure { diagnostics: String },

    #[error("Execution failed: {0}")]
    ExecutionFailure(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::SecurityViolation { pattern } => {
                EngineError::SecurityViolation { pattern }
            }
            ValidationError::StructuralError(msg) => EngineError::StructuralError(msg),
        }
    }
}
