// Subprocess invoker implementation
// Spawns one interpreter process per request: <interpreter> <script> <json>

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{info, warn};

use scriptgate_core::domain::{ProcessOutcome, RequestEnvelope};
use scriptgate_core::port::{InvokeError, ScriptInvoker};

/// Default cap on captured stdout/stderr (matches the 1 MiB buffer the
/// gateway has always allowed scripts).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Subprocess invoker configuration
#[derive(Debug, Clone)]
pub struct InvokerConfig {
    /// Interpreter binary, e.g. a venv python3
    pub interpreter: PathBuf,
    /// Script handed to the interpreter as its first argument
    pub script: PathBuf,
    /// Working directory override (scripts often expect their venv here)
    pub working_dir: Option<PathBuf>,
    /// Environment entries applied on top of the inherited environment
    pub env_overrides: HashMap<String, String>,
    /// Captured output above this size fails the request, never truncates
    pub max_output_bytes: usize,
}

impl InvokerConfig {
    pub fn new(interpreter: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            working_dir: None,
            env_overrides: HashMap::new(),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// Script invoker backed by a real OS subprocess.
///
/// Each call spawns exactly one process and waits for it to exit; there is
/// no pooling, no retry, and no timeout. A hung script hangs its request.
pub struct SubprocessInvoker {
    config: InvokerConfig,
}

impl SubprocessInvoker {
    pub fn new(config: InvokerConfig) -> Self {
        Self { config }
    }

    fn check_output_size(&self, stdout: &[u8], stderr: &[u8]) -> Result<(), InvokeError> {
        let limit = self.config.max_output_bytes;
        let actual = stdout.len().max(stderr.len());
        if actual > limit {
            return Err(InvokeError::OutputTooLarge { limit, actual });
        }
        Ok(())
    }
}

#[async_trait]
impl ScriptInvoker for SubprocessInvoker {
    async fn invoke(&self, envelope: &RequestEnvelope) -> Result<ProcessOutcome, InvokeError> {
        let payload = envelope
            .to_wire()
            .map_err(|e| InvokeError::InvalidPayload(e.to_string()))?;

        let start = Instant::now();

        info!(
            interpreter = %self.config.interpreter.display(),
            script = %self.config.script.display(),
            field = %envelope.field_name,
            "Starting script invocation"
        );

        let mut cmd = Command::new(&self.config.interpreter);
        cmd.arg(&self.config.script)
            .arg(&payload)
            .envs(&self.config.env_overrides)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }

        let child = cmd
            .spawn()
            .map_err(|e| InvokeError::SpawnFailed(e.to_string()))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| InvokeError::IoError(e.to_string()))?;

        let duration_ms = start.elapsed().as_millis() as i64;

        self.check_output_size(&output.stdout, &output.stderr)?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            info!(
                field = %envelope.field_name,
                duration_ms = %duration_ms,
                stdout_bytes = %output.stdout.len(),
                "Script invocation completed"
            );
            Ok(ProcessOutcome::Success { stdout, stderr })
        } else {
            warn!(
                field = %envelope.field_name,
                duration_ms = %duration_ms,
                exit_code = ?output.status.code(),
                "Script invocation failed"
            );
            Ok(ProcessOutcome::Failure {
                exit_code: output.status.code(),
                stderr,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> RequestEnvelope {
        RequestEnvelope::new("ping", serde_json::Map::new())
    }

    #[tokio::test]
    async fn test_spawn_failure_for_missing_interpreter() {
        let invoker = SubprocessInvoker::new(InvokerConfig::new(
            "/nonexistent/interpreter",
            "/nonexistent/script.py",
        ));

        let err = invoker.invoke(&envelope()).await.unwrap_err();
        assert!(matches!(err, InvokeError::SpawnFailed(_)));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure_outcome_not_error() {
        // /bin/false ignores its arguments and exits 1
        let invoker = SubprocessInvoker::new(InvokerConfig::new("/bin/false", "ignored"));

        let outcome = invoker.invoke(&envelope()).await.unwrap();
        match outcome {
            ProcessOutcome::Failure { exit_code, .. } => assert_eq!(exit_code, Some(1)),
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[test]
    fn test_output_size_check() {
        let mut config = InvokerConfig::new("/bin/true", "x");
        config.max_output_bytes = 4;
        let invoker = SubprocessInvoker::new(config);

        assert!(invoker.check_output_size(b"ok", b"").is_ok());
        let err = invoker.check_output_size(b"too long", b"").unwrap_err();
        assert!(matches!(
            err,
            InvokeError::OutputTooLarge {
                limit: 4,
                actual: 8
            }
        ));
    }
}
