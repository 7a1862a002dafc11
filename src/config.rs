use std::path::PathBuf;

use crate::constants::{DEFAULT_JAVA, DEFAULT_JAVAC, DEFAULT_TIMEOUT_MS, WORKSPACE_DIR_NAME};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub javac_path: PathBuf,
    pub java_path: PathBuf,
    pub workspace_root: PathBuf,
    pub default_timeout_ms: u64,
    /// Treat the toolchain as missing even if it is installed.
    pub force_simulation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            javac_path: PathBuf::from(DEFAULT_JAVAC),
            java_path: PathBuf::from(DEFAULT_JAVA),
            workspace_root: std::env::temp_dir().join(WORKSPACE_DIR_NAME),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            force_simulation: false,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_timeout_ms = match lookup("MISSION_ENGINE_TIMEOUT_MS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "ignoring invalid MISSION_ENGINE_TIMEOUT_MS");
                defaults.default_timeout_ms
            }),
            None => defaults.default_timeout_ms,
        };

        let force_simulation = lookup("MISSION_ENGINE_FORCE_SIMULATION")
            .map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.force_simulation);

        Self {
            javac_path: lookup("JAVAC_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.javac_path),
            java_path: lookup("JAVA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.java_path),
            workspace_root: lookup("MISSION_ENGINE_WORKSPACE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.workspace_root),
            default_timeout_ms,
            force_simulation,
        }
    }
}
