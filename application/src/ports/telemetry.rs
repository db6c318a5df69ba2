//! Telemetry port.
//!
//! The pipeline emits one [`TelemetryRecord`] per completed invocation —
//! success or failure — through this port. Records never contain raw
//! arguments or raw results. The JSONL adapter lives in the infrastructure
//! layer; recording is strictly best-effort and implementations must
//! swallow their own failures.

use serde::{Deserialize, Serialize};

/// Schema version stamped on every record.
pub const TELEMETRY_SCHEMA_VERSION: u32 = 1;

/// One immutable usage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub schema_version: u32,
    /// RFC 3339 timestamp.
    pub recorded_at: String,
    pub app: String,
    /// App-qualified command identifier, `<app>.<command>`.
    pub command: String,
    pub success: bool,
    pub duration_ms: u64,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<String>,
}

impl TelemetryRecord {
    /// Build a record stamped with the current time.
    #[allow(clippy::too_many_arguments)]
    pub fn now(
        app: impl Into<String>,
        command: impl Into<String>,
        success: bool,
        duration_ms: u64,
        exit_code: i32,
        error_code: Option<String>,
        error_category: Option<String>,
    ) -> Self {
        Self {
            schema_version: TELEMETRY_SCHEMA_VERSION,
            recorded_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            app: app.into(),
            command: command.into(),
            success,
            duration_ms,
            exit_code,
            error_code,
            error_category,
        }
    }
}

/// Sink for usage records.
pub trait TelemetryPort: Send + Sync {
    /// Record one invocation. Must never fail, block indefinitely, or
    /// surface errors to the caller.
    fn record(&self, record: &TelemetryRecord);
}

/// Discards every record; injected when telemetry is disabled and in tests.
pub struct NoopTelemetry;

impl TelemetryPort for NoopTelemetry {
    fn record(&self, _record: &TelemetryRecord) {}
}
