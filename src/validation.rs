//! Textual screening of submitted Java source.
//!
//! This is the only barrier between submitted code and the host: there is no
//! container or seccomp layer underneath. Matching is done on the raw text,
//! so a blocked name inside a comment or string literal is still rejected.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::MAX_SOURCE_BYTES;

const BLOCKED_PATTERNS: &[&str] = &[
    r"System\.exit",
    r"Runtime\.getRuntime\(\)\.exec",
    r"ProcessBuilder",
    r"FileOutputStream",
    r"FileInputStream",
    r"Socket",
    r"ServerSocket",
    r"reflection\.invoke",
];

static DENYLIST: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    BLOCKED_PATTERNS
        .iter()
        .map(|pattern| (*pattern, Regex::new(pattern).expect("denylist pattern")))
        .collect()
});

static PUBLIC_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"public\s+class\s+(\w+)").expect("class pattern"));

static MAIN_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"public\s+static\s+void\s+main\s*\(\s*String\s*\[\s*\]\s+\w+\s*\)")
        .expect("main pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Blocked pattern detected: {pattern}")]
    SecurityViolation { pattern: String },
    #[error("{0}")]
    StructuralError(String),
}

/// Screens source that is compiled next to a harness.
pub fn validate(source: &str) -> Result<(), ValidationError> {
    if source.len() > MAX_SOURCE_BYTES {
        return Err(ValidationError::StructuralError(format!(
            "Code size exceeds maximum limit ({}KB)",
            MAX_SOURCE_BYTES / 1000
        )));
    }

    if let Some((pattern, _)) = DENYLIST.iter().find(|(_, re)| re.is_match(source)) {
        tracing::warn!(pattern, "rejected submission with blocked pattern");
        return Err(ValidationError::SecurityViolation {
            pattern: pattern.to_string(),
        });
    }

    if detect_public_class(source).is_none() {
        return Err(ValidationError::StructuralError(
            "Java code must contain a public class declaration".to_string(),
        ));
    }

    Ok(())
}

/// Screens source that has to run on its own, so it also needs an entry point.
pub fn validate_standalone(source: &str) -> Result<(), ValidationError> {
    validate(source)?;

    if !MAIN_METHOD.is_match(source) {
        return Err(ValidationError::StructuralError(
            "Java code must contain public static void main(String[] args) method".to_string(),
        ));
    }

    Ok(())
}

/// First `public class` name in the source; the file has to be named after it.
pub fn detect_public_class(source: &str) -> Option<String> {
    PUBLIC_CLASS
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
