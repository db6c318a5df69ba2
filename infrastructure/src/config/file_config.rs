//! Configuration file schema (`prism.toml`).
//!
//! Example:
//!
//! ```toml
//! [app]
//! name = "prism"
//!
//! [security]
//! policy = "standard"        # off | standard | strict
//!
//! [telemetry]
//! enabled = true
//! path = "~/.local/share/prism/telemetry.jsonl"
//! retention_days = 30
//!
//! [tools]
//! namespace = ""             # optional prefix applied to every view
//! include_hidden = false
//! manifests = ["./tools.toml"]
//! ```
//!
//! Every field has a serde default so partial files merge cleanly; the
//! loader stacks these under figment with `PRISM_*` environment overrides.

use serde::{Deserialize, Serialize};

/// `[app]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAppConfig {
    /// Application name used to qualify tool identifiers.
    pub name: String,
    /// Override of the host version; defaults to the crate version at the
    /// wiring layer when empty.
    pub version: Option<String>,
}

impl Default for FileAppConfig {
    fn default() -> Self {
        Self {
            name: "prism".to_string(),
            version: None,
        }
    }
}

/// `[security]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSecurityConfig {
    /// `off` | `standard` | `strict`; anything else resolves to standard.
    pub policy: String,
    /// Non-interactive bypass signal (`PRISM_SECURITY__ASSUME_YES`).
    pub assume_yes: bool,
}

impl Default for FileSecurityConfig {
    fn default() -> Self {
        Self {
            policy: "standard".to_string(),
            assume_yes: false,
        }
    }
}

/// `[telemetry]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTelemetryConfig {
    pub enabled: bool,
    pub path: Option<String>,
    pub retention_days: u32,
}

impl Default for FileTelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            retention_days: 30,
        }
    }
}

/// `[tools]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Optional namespace prefix applied to every view.
    pub namespace: Option<String>,
    pub include_hidden: bool,
    /// Tool manifest files loaded as additional providers.
    pub manifests: Vec<String>,
}

/// `[auth]` section.
///
/// Scopes are opaque to prism; they ride on the invocation context for
/// handlers that choose to check them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuthConfig {
    pub scopes: Vec<String>,
}

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub app: FileAppConfig,
    pub security: FileSecurityConfig,
    pub telemetry: FileTelemetryConfig,
    pub tools: FileToolsConfig,
    pub auth: FileAuthConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.app.name, "prism");
        assert_eq!(config.security.policy, "standard");
        assert!(!config.security.assume_yes);
        assert!(config.telemetry.enabled);
        assert_eq!(config.telemetry.retention_days, 30);
        assert!(config.tools.manifests.is_empty());
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [security]
            policy = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(config.security.policy, "strict");
        // Untouched sections keep their defaults.
        assert!(config.telemetry.enabled);
        assert_eq!(config.app.name, "prism");
    }

    #[test]
    fn test_full_document_parses() {
        let config: FileConfig = toml::from_str(
            r#"
            [app]
            name = "acme"
            version = "3.1.0"

            [security]
            policy = "off"
            assume_yes = true

            [telemetry]
            enabled = false
            path = "/tmp/t.jsonl"
            retention_days = 7

            [tools]
            namespace = "acme"
            include_hidden = true
            manifests = ["./tools.toml", "./extra.toml"]
            "#,
        )
        .unwrap();
        assert_eq!(config.app.version.as_deref(), Some("3.1.0"));
        assert!(config.security.assume_yes);
        assert_eq!(config.telemetry.retention_days, 7);
        assert_eq!(config.tools.manifests.len(), 2);
    }
}
