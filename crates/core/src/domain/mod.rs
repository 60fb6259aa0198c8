// Domain Layer - Pure entities of the GraphQL-to-script bridge

pub mod envelope;
pub mod error;
pub mod outcome;

// Re-exports
pub use envelope::RequestEnvelope;
pub use error::BridgeError;
pub use outcome::ProcessOutcome;
