// Application Layer - the request-to-process bridge

pub mod bridge;
pub mod extract;

// Re-exports
pub use bridge::ScriptBridge;
pub use extract::{extract, unwrap_field};
