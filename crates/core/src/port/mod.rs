// Port Layer - Interfaces for external dependencies

pub mod script_invoker;

// Re-exports
pub use script_invoker::{InvokeError, ScriptInvoker};
