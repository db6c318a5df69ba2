//! Ports (interfaces) implemented by the infrastructure and presentation
//! layers.

pub mod confirmation;
pub mod telemetry;

pub use confirmation::{ConfirmationError, ConfirmationPort, StaticConfirmation};
pub use telemetry::{NoopTelemetry, TelemetryPort, TelemetryRecord};
