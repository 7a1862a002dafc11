use itertools::Itertools;
use serde::Serialize;

use crate::constants::SENTINEL_PASSED;
use crate::core::domain::ExecutionResult;

/// What the caller shows the student: pass/fail plus a line transcript.
///
/// The engine never decides pass/fail itself; this is the boundary rule
/// applied on top of the raw `ExecutionResult`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    pub transcript: Vec<String>,
}

impl Verdict {
    pub fn from_result(result: &ExecutionResult) -> Self {
        let transcript = result
            .output
            .lines()
            .chain(result.compilation_error.iter().flat_map(|e| e.lines()))
            .chain(result.error.iter().flat_map(|e| e.lines()))
            .map(str::to_string)
            .collect();

        Self {
            passed: result.output.contains(SENTINEL_PASSED),
            transcript,
        }
    }

    pub fn render(&self) -> String {
        self.transcript.iter().join("\n")
    }
}
