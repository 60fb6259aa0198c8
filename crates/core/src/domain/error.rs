// Bridge Error Taxonomy
// Every failure of the request-to-process pipeline becomes exactly one of
// these; no kind is retried or recovered locally.

use thiserror::Error;

/// Errors produced by the field-to-script bridge.
///
/// `Spawn` and `ProcessExit` both carry the user-facing "execution failed"
/// prefix so callers can grep for it; `ResultParse` is kept distinct so
/// "your logic failed" and "your logic emitted malformed output" are
/// distinguishable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Interpreter or script could not be started.
    #[error("execution failed: {0}")]
    Spawn(String),

    /// Script ran but exited non-zero. Carries a stderr excerpt for
    /// diagnosability, never silently swallowed.
    #[error("execution failed with exit code {}: {stderr}", fmt_exit_code(.exit_code))]
    ProcessExit {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The last non-empty stdout line was not decodable JSON.
    #[error("failed to parse script output: {0}")]
    ResultParse(String),
}

fn fmt_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "unknown".to_string(),
    }
}

/// Cap applied to stderr before it is embedded in an error message.
pub const STDERR_EXCERPT_MAX: usize = 2000;

/// Truncate stderr to a bounded excerpt on a char boundary.
pub fn stderr_excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.len() <= STDERR_EXCERPT_MAX {
        return trimmed.to_string();
    }
    let mut end = STDERR_EXCERPT_MAX;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &trimmed[..end])
}
