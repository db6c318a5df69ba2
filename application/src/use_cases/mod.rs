//! Application use cases.

pub mod invoke_command;

pub use invoke_command::{InvocationOutcome, InvokeCommandUseCase};
