// Script Invoker Port
// Abstraction over launching the external script as a subprocess

use crate::domain::{ProcessOutcome, RequestEnvelope};
use async_trait::async_trait;
use thiserror::Error;

/// Invocation errors
///
/// These cover everything that goes wrong before a clean exit status is
/// observed. A non-zero exit is NOT an `InvokeError`; it is reported as
/// `ProcessOutcome::Failure` so the caller can attach stderr context.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Captured output exceeded {limit} bytes (got {actual})")]
    OutputTooLarge { limit: usize, actual: usize },
}

/// Script Invoker trait
///
/// Implementations:
/// - SubprocessInvoker: spawns one OS process per call (infra-process)
/// - MockScriptInvoker: canned outcomes for tests (below)
#[async_trait]
pub trait ScriptInvoker: Send + Sync {
    /// Invoke the script with the given envelope and wait for it to exit.
    ///
    /// Exactly one process is spawned per call; no pooling, no retry,
    /// no timeout. The caller suspends until the process terminates.
    ///
    /// # Errors
    /// - InvokeError::SpawnFailed if the process cannot be started
    /// - InvokeError::OutputTooLarge if captured output exceeds the cap
    async fn invoke(&self, envelope: &RequestEnvelope) -> Result<ProcessOutcome, InvokeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Mock invoker behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit 0 with the given stdout/stderr
        Success { stdout: String, stderr: String },
        /// Exit non-zero with the given stderr
        Exit { code: i32, stderr: String },
        /// Fail to spawn with message
        SpawnFail(String),
    }

    /// Mock Script Invoker for testing
    pub struct MockScriptInvoker {
        behavior: MockBehavior,
        calls: Mutex<Vec<RequestEnvelope>>,
    }

    impl MockScriptInvoker {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn new_success(stdout: impl Into<String>) -> Self {
            Self::new(MockBehavior::Success {
                stdout: stdout.into(),
                stderr: String::new(),
            })
        }

        pub fn new_exit(code: i32, stderr: impl Into<String>) -> Self {
            Self::new(MockBehavior::Exit {
                code,
                stderr: stderr.into(),
            })
        }

        pub fn new_spawn_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::SpawnFail(message.into()))
        }

        /// Envelopes received so far, in call order.
        pub fn calls(&self) -> Vec<RequestEnvelope> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ScriptInvoker for MockScriptInvoker {
        async fn invoke(&self, envelope: &RequestEnvelope) -> Result<ProcessOutcome, InvokeError> {
            self.calls.lock().unwrap().push(envelope.clone());

            match self.behavior.clone() {
                MockBehavior::Success { stdout, stderr } => {
                    Ok(ProcessOutcome::Success { stdout, stderr })
                }
                MockBehavior::Exit { code, stderr } => Ok(ProcessOutcome::Failure {
                    exit_code: Some(code),
                    stderr,
                }),
                MockBehavior::SpawnFail(msg) => Err(InvokeError::SpawnFailed(msg)),
            }
        }
    }
}
