use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use once_cell::sync::OnceCell as SyncOnceCell;
use tokio::process::Command;
use tokio::sync::OnceCell;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

static SHARED: SyncOnceCell<Arc<ToolchainProbe>> = SyncOnceCell::new();

/// Detects once whether the Java compiler can be launched.
///
/// The answer is cached for the lifetime of the probe and never refreshed,
/// so installing a JDK while the process runs has no effect.
#[derive(Debug)]
pub struct ToolchainProbe {
    compiler_path: PathBuf,
    available: OnceCell<bool>,
    probes: AtomicUsize,
}

impl ToolchainProbe {
    pub fn new<T: AsRef<Path>>(compiler_path: T) -> Self {
        Self {
            compiler_path: compiler_path.as_ref().into(),
            available: OnceCell::new(),
            probes: AtomicUsize::new(0),
        }
    }

    /// Process-wide probe. The first caller decides which compiler is probed.
    pub fn shared<T: AsRef<Path>>(compiler_path: T) -> Arc<Self> {
        SHARED
            .get_or_init(|| Arc::new(Self::new(compiler_path)))
            .clone()
    }

    pub async fn check_availability(&self) -> bool {
        *self.available.get_or_init(|| self.probe()).await
    }

    /// Number of real subprocess probes performed so far.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    #[tracing::instrument(skip(self), fields(compiler = %self.compiler_path.display()))]
    async fn probe(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);

        let status = Command::new(&self.compiler_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        match tokio::time::timeout(PROBE_TIMEOUT, status).await {
            Ok(Ok(status)) if status.success() => {
                tracing::info!("Java toolchain available");
                true
            }
            Ok(Ok(status)) => {
                tracing::warn!(%status, "Java toolchain probe failed, falling back to simulation");
                false
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Java toolchain not found, falling back to simulation");
                false
            }
            Err(_) => {
                tracing::warn!("Java toolchain probe timed out, falling back to simulation");
                false
            }
        }
    }
}
