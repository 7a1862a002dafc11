use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

/// Hands out one private directory per execution under a common root.
#[derive(Clone, Debug)]
pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    pub fn new<T: AsRef<Path>>(root: T) -> Self {
        Self {
            root: root.as_ref().into(),
        }
    }

    pub async fn create(&self) -> std::io::Result<Workspace> {
        fs::create_dir_all(&self.root).await?;

        let suffix = Uuid::new_v4().simple().to_string();
        let name = format!(
            "exec_{}_{}",
            chrono::Utc::now().format("%Y%m%d%H%M%S%3f"),
            &suffix[..8]
        );
        let dir = self.root.join(name);
        // create_dir, not create_dir_all: a name collision must fail loudly
        fs::create_dir(&dir).await?;

        tracing::debug!(workspace = %dir.display(), "workspace created");
        Ok(Workspace {
            dir,
            released: false,
        })
    }
}

/// Directory owned by exactly one execution.
///
/// Call [`Workspace::destroy`] on every exit path. If the owner unwinds
/// before that, `Drop` removes the directory synchronously.
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    released: bool,
}

impl Workspace {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn write(&mut self, filename: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.join(filename);
        fs::write(&path, content).await?;
        Ok(path)
    }

    /// Best-effort recursive delete. Failures are logged and swallowed.
    pub async fn destroy(mut self) {
        self.released = true;
        match fs::remove_dir_all(&self.dir).await {
            Ok(()) => tracing::debug!(workspace = %self.dir.display(), "workspace destroyed"),
            Err(e) => tracing::warn!(
                workspace = %self.dir.display(),
                error = %e,
                "failed to destroy workspace"
            ),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            tracing::warn!(
                workspace = %self.dir.display(),
                error = %e,
                "failed to destroy abandoned workspace"
            );
        }
    }
}
