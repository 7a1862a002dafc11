pub const SENTINEL_PASSED: &str = "TEST_PASSED";
pub const SENTINEL_FAILED: &str = "TEST_FAILED";

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const MAX_SOURCE_BYTES: usize = 50_000;

pub const HARNESS_CLASS: &str = "Main";
pub const JAVA_EXTENSION: &str = "java";

pub const DEFAULT_JAVAC: &str = "javac";
pub const DEFAULT_JAVA: &str = "java";

pub const WORKSPACE_DIR_NAME: &str = "mission-engine";
