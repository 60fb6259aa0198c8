// Script Bridge - translates a GraphQL field invocation into one
// subprocess call and parses the answer

use crate::application::extract::{extract, unwrap_field};
use crate::domain::error::stderr_excerpt;
use crate::domain::{BridgeError, ProcessOutcome, RequestEnvelope};
use crate::port::{InvokeError, ScriptInvoker};
use std::sync::Arc;
use tracing::{debug, warn};

/// Field-to-script pipeline with an injected invoker.
///
/// One instance is shared by every resolver; it holds no per-request state,
/// so concurrent GraphQL operations need no locking discipline.
pub struct ScriptBridge {
    invoker: Arc<dyn ScriptInvoker>,
}

impl ScriptBridge {
    pub fn new(invoker: Arc<dyn ScriptInvoker>) -> Self {
        Self { invoker }
    }

    /// Resolve one GraphQL field through the external script.
    ///
    /// Builds the request envelope, invokes the script, and decodes the
    /// final stdout line. A field either fully resolves or fully errors;
    /// no partial results are returned.
    pub async fn resolve_field(
        &self,
        field_name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, BridgeError> {
        let envelope = RequestEnvelope::new(field_name, arguments);

        let outcome = self
            .invoker
            .invoke(&envelope)
            .await
            .map_err(map_invoke_error)?;

        match outcome {
            ProcessOutcome::Success { stdout, stderr } => {
                if !stderr.trim().is_empty() {
                    warn!(field = %field_name, stderr = %stderr_excerpt(&stderr), "Script wrote to stderr despite exiting 0");
                }
                let value = extract(&stdout)?;
                debug!(field = %field_name, "Script result decoded");
                Ok(unwrap_field(value, field_name))
            }
            ProcessOutcome::Failure { exit_code, stderr } => {
                warn!(field = %field_name, exit_code = ?exit_code, "Script exited non-zero");
                Err(BridgeError::ProcessExit {
                    exit_code,
                    stderr: stderr_excerpt(&stderr),
                })
            }
        }
    }
}

fn map_invoke_error(err: InvokeError) -> BridgeError {
    match err {
        InvokeError::SpawnFailed(msg) => BridgeError::Spawn(msg),
        InvokeError::IoError(msg) => BridgeError::Spawn(msg),
        InvokeError::InvalidPayload(msg) => BridgeError::Spawn(msg),
        InvokeError::OutputTooLarge { limit, actual } => BridgeError::ProcessExit {
            exit_code: None,
            stderr: format!("captured output exceeded {limit} bytes (got {actual})"),
        },
    }
}
