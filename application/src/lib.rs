//! Application layer for prism
//!
//! This crate contains the invocation pipeline use case, port definitions,
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{is_truthy, PipelineConfig, SecurityPolicy, TelemetrySettings};
pub use ports::{
    confirmation::{ConfirmationError, ConfirmationPort, StaticConfirmation},
    telemetry::{NoopTelemetry, TelemetryPort, TelemetryRecord, TELEMETRY_SCHEMA_VERSION},
};
pub use use_cases::invoke_command::{InvocationOutcome, InvokeCommandUseCase};
