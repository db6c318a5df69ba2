//! Telemetry sink adapters.

pub mod recorder;

pub use recorder::JsonlTelemetryRecorder;
