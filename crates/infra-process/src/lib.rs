// Scriptgate Infrastructure - Process Adapter

pub mod subprocess_invoker;

pub use subprocess_invoker::{InvokerConfig, SubprocessInvoker};
