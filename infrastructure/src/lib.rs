//! Infrastructure layer for prism
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration file loading, the JSONL telemetry
//! sink, and the manifest-backed tool provider.

pub mod config;
pub mod providers;
pub mod telemetry;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAppConfig, FileAuthConfig, FileConfig, FileSecurityConfig,
    FileTelemetryConfig, FileToolsConfig,
};
pub use providers::{ManifestToolProvider, ReloadOutcome};
pub use telemetry::JsonlTelemetryRecorder;
