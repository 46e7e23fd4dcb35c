//! Kubectl process executor

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

use crate::k8s::command::CommandSpec;
use crate::utils::errors::{InspectError, Result};

/// Captured output of one successful invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl RawOutput {
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }
}

/// Runs a [`CommandSpec`] and returns its output.
///
/// A non-zero exit is an `ExecutionFailed` error, never an `Ok` value.
pub trait Executor: Send + Sync {
    fn execute(&self, spec: &CommandSpec) -> impl Future<Output = Result<RawOutput>> + Send;
}

/// Executor backed by the real kubectl binary
#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: PathBuf,
    kubeconfig: Option<PathBuf>,
    max_output_bytes: Option<usize>,
    timeout: Option<Duration>,
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

impl Kubectl {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            kubeconfig: None,
            max_output_bytes: None,
            timeout: None,
        }
    }

    /// Run with `KUBECONFIG` pointing at this file
    pub fn with_kubeconfig(mut self, kubeconfig: Option<impl Into<PathBuf>>) -> Self {
        self.kubeconfig = kubeconfig.map(Into::into);
        self
    }

    /// Lower every command's output bound to at most `limit` bytes
    pub fn with_max_output_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_output_bytes = limit;
        self
    }

    /// Kill the process if it runs longer than `timeout`. Off by default.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn output_limit(&self, spec: &CommandSpec) -> usize {
        match self.max_output_bytes {
            Some(cap) => cap.min(spec.max_output_bytes()),
            None => spec.max_output_bytes(),
        }
    }

    async fn run(&self, spec: &CommandSpec) -> Result<RawOutput> {
        let start = Instant::now();
        let limit = self.output_limit(spec);

        let mut cmd = Command::new(&self.binary);
        if let Some(kc) = &self.kubeconfig {
            cmd.env("KUBECONFIG", kc);
        }
        cmd.args(spec.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        let stdout = child.stdout.take();
        let stderr_task = tokio::spawn(drain_stderr(child.stderr.take(), limit));

        let outcome = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, collect(&mut child, stdout, limit))
                .await
                .unwrap_or(Ok(Outcome::TimedOut)),
            None => collect(&mut child, stdout, limit).await,
        };

        // Anything short of a clean exit leaves a live child behind.
        let stderr = if matches!(outcome, Ok(Outcome::Exited { .. })) {
            stderr_task.await.unwrap_or_default()
        } else {
            let _ = child.kill().await;
            stderr_task.abort();
            Vec::new()
        };
        let stderr = String::from_utf8_lossy(&stderr).into_owned();

        let (status, stdout) = match outcome {
            Ok(Outcome::Exited { status, stdout }) => (status, stdout),
            Ok(Outcome::Overflow) => {
                tracing::warn!(command = %spec.display(), limit, "kubectl output overflow");
                return Err(InspectError::execution(format!(
                    "kubectl output exceeded {} bytes",
                    limit
                )));
            }
            Ok(Outcome::TimedOut) => {
                let secs = self.timeout.map(|t| t.as_secs_f64()).unwrap_or_default();
                return Err(InspectError::execution(format!(
                    "kubectl timed out after {}s",
                    secs
                )));
            }
            Err(e) => {
                return Err(InspectError::execution(format!(
                    "failed to read kubectl output: {}",
                    e
                )));
            }
        };

        let exit_code = status.code().unwrap_or(-1);
        tracing::debug!(
            command = %spec.display(),
            exit_code,
            duration_ms = start.elapsed().as_millis() as u64,
            "kubectl invocation"
        );

        if !status.success() {
            let diagnostic = stderr.trim();
            let message = if diagnostic.is_empty() {
                format!("kubectl exited with status {}", exit_code)
            } else {
                diagnostic.to_string()
            };
            return Err(InspectError::execution(message));
        }

        if !stderr.trim().is_empty() {
            crate::log_warn!("kubectl warning: {}", stderr.trim());
        }

        Ok(RawOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr,
            exit_code,
        })
    }

    fn spawn_error(&self, err: std::io::Error) -> InspectError {
        if err.kind() == std::io::ErrorKind::NotFound {
            InspectError::execution(format!("{}: not found in PATH", self.binary.display()))
        } else {
            InspectError::execution(format!(
                "{}: failed to start: {}",
                self.binary.display(),
                err
            ))
        }
    }
}

impl Executor for Kubectl {
    async fn execute(&self, spec: &CommandSpec) -> Result<RawOutput> {
        self.run(spec).await
    }
}

enum Outcome {
    Exited { status: ExitStatus, stdout: Vec<u8> },
    Overflow,
    TimedOut,
}

async fn collect(
    child: &mut Child,
    stdout: Option<ChildStdout>,
    limit: usize,
) -> std::io::Result<Outcome> {
    let (bytes, overflow) = match stdout {
        Some(out) => read_bounded(out, limit).await?,
        None => (Vec::new(), false),
    };

    if overflow {
        return Ok(Outcome::Overflow);
    }

    let status = child.wait().await?;
    Ok(Outcome::Exited {
        status,
        stdout: bytes,
    })
}

/// Read at most `limit + 1` bytes; the extra byte signals overflow.
async fn read_bounded<R: AsyncRead + Unpin>(
    reader: R,
    limit: usize,
) -> std::io::Result<(Vec<u8>, bool)> {
    let mut buf = Vec::new();
    reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut buf)
        .await?;
    let overflow = buf.len() > limit;
    Ok((buf, overflow))
}

/// Keep up to `limit` bytes of stderr and discard the rest so the child
/// never blocks on a full pipe.
async fn drain_stderr(stderr: Option<ChildStderr>, limit: usize) -> Vec<u8> {
    let Some(mut stderr) = stderr else {
        return Vec::new();
    };

    let mut buf = Vec::new();
    let _ = (&mut stderr)
        .take(limit as u64)
        .read_to_end(&mut buf)
        .await;
    let _ = tokio::io::copy(&mut stderr, &mut tokio::io::sink()).await;
    buf
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::k8s::command::CommandBuilder;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn fake_kubectl(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("kubectl");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_arguments_are_passed_verbatim() {
        let dir = TempDir::new().unwrap();
        let kubectl = Kubectl::new(fake_kubectl(&dir, r#"printf '%s\n' "$@""#));

        let spec = CommandBuilder::new("get")
            .arg("pods")
            .pair("-n", "shop; echo pwned")
            .build();
        let output = kubectl.execute(&spec).await.unwrap();

        let lines: Vec<&str> = output.stdout.lines().collect();
        assert_eq!(lines, ["get", "pods", "-n", "shop; echo pwned"]);
        assert_eq!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn test_non_zero_exit_uses_stderr_verbatim() {
        let dir = TempDir::new().unwrap();
        let kubectl = Kubectl::new(fake_kubectl(
            &dir,
            r#"echo 'Error from server (NotFound): pods "web" not found' >&2; exit 1"#,
        ));

        let err = kubectl
            .execute(&CommandBuilder::new("get").build())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            InspectError::execution(r#"Error from server (NotFound): pods "web" not found"#)
        );
    }

    #[tokio::test]
    async fn test_non_zero_exit_without_stderr() {
        let dir = TempDir::new().unwrap();
        let kubectl = Kubectl::new(fake_kubectl(&dir, "exit 3"));

        let err = kubectl
            .execute(&CommandBuilder::new("get").build())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "kubectl exited with status 3");
    }

    #[tokio::test]
    async fn test_warning_on_success_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let kubectl = Kubectl::new(fake_kubectl(
            &dir,
            "echo 'Warning: v1 Endpoints is deprecated' >&2; echo '{}'",
        ));

        let output = kubectl
            .execute(&CommandBuilder::new("get").build())
            .await;
        let output = tokio_test::assert_ok!(output);
        assert_eq!(output.stdout.trim(), "{}");
        assert!(output.stderr.contains("deprecated"));
    }

    #[tokio::test]
    async fn test_output_overflow_fails_without_hanging() {
        let dir = TempDir::new().unwrap();
        let kubectl = Kubectl::new(fake_kubectl(
            &dir,
            "while true; do echo 0123456789abcdef; done",
        ));

        let spec = CommandBuilder::new("logs").max_output_bytes(1024).build();
        let err = kubectl.execute(&spec).await.unwrap_err();
        assert_eq!(err.to_string(), "kubectl output exceeded 1024 bytes");
    }

    #[tokio::test]
    async fn test_executor_cap_lowers_limit() {
        let dir = TempDir::new().unwrap();
        let kubectl = Kubectl::new(fake_kubectl(&dir, "printf '%0200d' 0"))
            .with_max_output_bytes(Some(100));

        let err = kubectl
            .execute(&CommandBuilder::new("get").build())
            .await
            .unwrap_err();
        assert!(matches!(err, InspectError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let kubectl = Kubectl::new("/nonexistent/bin/kubectl-xyz");
        let err = kubectl
            .execute(&CommandBuilder::new("get").build())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found in PATH"));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let dir = TempDir::new().unwrap();
        let kubectl = Kubectl::new(fake_kubectl(&dir, "exec sleep 10"))
            .with_timeout(Some(Duration::from_millis(100)));

        let start = Instant::now();
        let err = kubectl
            .execute(&CommandBuilder::new("get").build())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_kubeconfig_is_exported() {
        let dir = TempDir::new().unwrap();
        let kubectl = Kubectl::new(fake_kubectl(&dir, r#"printf '%s' "$KUBECONFIG""#))
            .with_kubeconfig(Some("/tmp/kind-config"));

        let output = kubectl
            .execute(&CommandBuilder::new("get").build())
            .await
            .unwrap();
        assert_eq!(output.stdout, "/tmp/kind-config");
    }
}
