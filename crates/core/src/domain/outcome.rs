// Process Outcome - result of one subprocess invocation

/// Outcome of a single script invocation.
///
/// Produced by the `ScriptInvoker` port, consumed immediately by the
/// extraction pipeline, discarded after. `Failure` means the process ran
/// but exited non-zero; spawn errors never reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Success {
        stdout: String,
        stderr: String,
    },
    Failure {
        exit_code: Option<i32>,
        stderr: String,
    },
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Success { .. })
    }
}
