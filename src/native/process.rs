use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::{Instant, timeout};

/// How long to keep reading pipes after a timed-out child was killed.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("{0}")]
    Spawn(std::io::Error),
    #[error("failed to wait for process: {0}")]
    Wait(std::io::Error),
    /// Carries whatever the child printed before it was killed, trimmed.
    #[error("process timed out after {} ms", .limit.as_millis())]
    TimedOut {
        limit: Duration,
        stdout: String,
        stderr: String,
    },
}

pub struct Finished {
    pub output: Output,
    pub elapsed_ms: u64,
}

/// Spawns `cmd` with piped output and waits at most `limit` for it.
///
/// Both pipes are read while the child runs. When the deadline passes the
/// child is killed and the output collected so far is returned in
/// `ProcessError::TimedOut`.
pub async fn run_with_timeout(
    mut cmd: Command,
    limit: Duration,
) -> Result<Finished, ProcessError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let started = Instant::now();
    let mut child = cmd.spawn().map_err(ProcessError::Spawn)?;
    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    let collected = timeout(limit, async {
        let (status, out, err) = tokio::join!(
            child.wait(),
            drain(&mut stdout_pipe, &mut stdout),
            drain(&mut stderr_pipe, &mut stderr),
        );
        out.and(err).and(status)
    })
    .await;

    match collected {
        Ok(Ok(status)) => Ok(Finished {
            output: Output {
                status,
                stdout,
                stderr,
            },
            elapsed_ms: started.elapsed().as_millis() as u64,
        }),
        Ok(Err(e)) => Err(ProcessError::Wait(e)),
        Err(_) => {
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "failed to kill timed out process");
            }
            // Bytes already sitting in the pipes when the child died.
            let _ = timeout(DRAIN_GRACE, async {
                tokio::join!(
                    drain(&mut stdout_pipe, &mut stdout),
                    drain(&mut stderr_pipe, &mut stderr),
                )
            })
            .await;

            tracing::warn!(limit_ms = limit.as_millis() as u64, "killed process after timeout");
            Err(ProcessError::TimedOut {
                limit,
                stdout: String::from_utf8_lossy(&stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            })
        }
    }
}

/// Appends everything readable from `pipe` to `buf`. Each chunk lands in
/// `buf` as soon as it is read, so cancelling keeps what arrived so far.
async fn drain<R>(pipe: &mut Option<R>, buf: &mut Vec<u8>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe.as_mut() else {
        return Ok(());
    };

    let mut chunk = [0u8; 4096];
    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn test_captures_output() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo out; echo err >&2; exit 3");

        let finished = run_with_timeout(cmd, Duration::from_secs(5)).await.unwrap();
        assert_eq!(finished.output.status.code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&finished.output.stdout), "out\n");
        assert_eq!(String::from_utf8_lossy(&finished.output.stderr), "err\n");
    }

    #[tokio::test]
    async fn test_kills_on_timeout() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");

        let started = Instant::now();
        let result = run_with_timeout(cmd, Duration::from_millis(200)).await;

        assert!(matches!(result, Err(ProcessError::TimedOut { .. })));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_timeout_keeps_partial_output() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg("echo header; echo warming up >&2; while true; do :; done");

        let result = run_with_timeout(cmd, Duration::from_millis(300)).await;

        match result {
            Err(ProcessError::TimedOut {
                limit,
                stdout,
                stderr,
            }) => {
                assert_eq!(limit, Duration::from_millis(300));
                assert_eq!(stdout, "header");
                assert_eq!(stderr, "warming up");
            }
            other => panic!("unexpected result: {:?}", other.map(|f| f.output)),
        }
    }

    #[tokio::test]
    async fn test_spawn_error() {
        let cmd = Command::new("/nonexistent/binary");
        let result = run_with_timeout(cmd, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(ProcessError::Spawn(_))));
    }
}
