//! Application configuration resolved once at startup.
//!
//! Following the documented precedence chain — constructor argument >
//! environment > default — the binary resolves everything into a
//! [`PipelineConfig`] before the first invocation and passes it by
//! reference through the pipeline. Nothing in the pipeline reads the
//! environment ad hoc mid-execution.

use std::path::PathBuf;

use prism_domain::Version;

/// Security policy governing destructive commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityPolicy {
    /// Destructive commands proceed unconditionally.
    Off,
    /// `--force`, `--yes`, or the bypass signal skip the prompt.
    #[default]
    Standard,
    /// Only `--force` or an interactive confirmation proceed; `--yes` and
    /// the bypass signal are ignored.
    Strict,
}

impl SecurityPolicy {
    /// Parse a policy string; unrecognized values fall back to `Standard`.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "off" => SecurityPolicy::Off,
            "strict" => SecurityPolicy::Strict,
            "standard" => SecurityPolicy::Standard,
            other => {
                tracing::warn!(policy = other, "unrecognized security policy, using standard");
                SecurityPolicy::Standard
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityPolicy::Off => "off",
            SecurityPolicy::Standard => "standard",
            SecurityPolicy::Strict => "strict",
        }
    }
}

/// Telemetry sink settings.
#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub enabled: bool,
    /// JSONL log location; `None` lets the recorder pick the platform
    /// default under the user data directory.
    pub path: Option<PathBuf>,
    pub retention_days: u32,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            retention_days: 30,
        }
    }
}

/// Everything the invocation pipeline needs to know about its host.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Application name used to qualify tool identifiers (`<app>.<command>`).
    pub app_name: String,
    /// Host application version; drives deprecation/removal evaluation.
    pub app_version: Version,
    pub security_policy: SecurityPolicy,
    /// Non-interactive bypass signal, already resolved from the
    /// environment at startup.
    pub assume_yes: bool,
    pub telemetry: TelemetrySettings,
}

impl PipelineConfig {
    pub fn new(app_name: impl Into<String>, app_version: Version) -> Self {
        Self {
            app_name: app_name.into(),
            app_version,
            security_policy: SecurityPolicy::default(),
            assume_yes: false,
            telemetry: TelemetrySettings::default(),
        }
    }

    pub fn with_security_policy(mut self, policy: SecurityPolicy) -> Self {
        self.security_policy = policy;
        self
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    pub fn with_telemetry(mut self, telemetry: TelemetrySettings) -> Self {
        self.telemetry = telemetry;
        self
    }
}

/// Interpret an environment-style truthy string ("1", "true", "yes", "on").
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
