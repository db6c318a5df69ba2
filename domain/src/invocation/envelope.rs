//! The result envelope: the uniform success/error wrapper returned by every
//! invocation regardless of output surface.

use serde::{Deserialize, Serialize};

use super::error::InvocationError;
use crate::core::version::Version;

/// Actionable hint attached to a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl Suggestion {
    fn is_empty(&self) -> bool {
        self.action.is_none() && self.fix.is_none() && self.example.is_none()
    }
}

/// The `error` object of a failure envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Suggestion::is_empty")]
    pub suggestion: Suggestion,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// The `meta` object of a success envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    /// App-qualified tool identifier, `<app>.<command>`.
    pub tool: String,
    /// Host application version.
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// The uniform invocation result.
///
/// Success envelopes never carry an `error` key; failure envelopes never
/// carry `result` or `meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<EnvelopeMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Envelope {
    /// Build a success envelope. `result` must already be sanitized.
    pub fn success(
        app: &str,
        command: &str,
        app_version: Version,
        result: serde_json::Value,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            ok: true,
            result: Some(result),
            meta: Some(EnvelopeMeta {
                tool: format!("{}.{}", app, command),
                version: app_version.to_string(),
                warnings,
            }),
            error: None,
        }
    }

    /// Build a failure envelope from a classified error.
    pub fn failure(error: &InvocationError) -> Self {
        let (suggestion, details) = Self::enrich(error);
        Self {
            ok: false,
            result: None,
            meta: None,
            error: Some(ErrorObject {
                code: error.code().to_string(),
                message: error.to_string(),
                category: error.category().to_string(),
                suggestion,
                details,
            }),
        }
    }

    /// Per-kind suggestion and details payloads.
    fn enrich(
        error: &InvocationError,
    ) -> (Suggestion, serde_json::Map<String, serde_json::Value>) {
        let mut details = serde_json::Map::new();
        let suggestion = match error {
            InvocationError::Removed {
                removed_in,
                migration,
                ..
            } => {
                details.insert(
                    "deprecated_version".to_string(),
                    serde_json::json!(removed_in.to_string()),
                );
                Suggestion {
                    action: Some("migrate command usage".to_string()),
                    fix: migration.clone(),
                    example: None,
                }
            }
            InvocationError::CommandNotFound { .. } => Suggestion {
                action: Some("list available commands".to_string()),
                example: Some("prism tools list".to_string()),
                fix: None,
            },
            InvocationError::InvalidArguments { command, .. } => Suggestion {
                action: Some("check the command's declared parameters".to_string()),
                example: Some(format!("prism tools schema | jq '.[] | select(.name == \"{}\")'", command)),
                fix: None,
            },
            InvocationError::ConfirmationDenied { command } => Suggestion {
                action: Some("re-run with an explicit override".to_string()),
                example: Some(format!("prism {} --force", command)),
                fix: None,
            },
            InvocationError::PromptUnavailable { command } => Suggestion {
                action: Some("re-run with the bypass flag".to_string()),
                example: Some(format!("prism {} --yes", command)),
                fix: None,
            },
            InvocationError::InvalidConfirmation { .. } => {
                details.insert(
                    "accepted".to_string(),
                    serde_json::json!(["y", "yes", "n", "no", ""]),
                );
                Suggestion::default()
            }
            InvocationError::Internal { .. } => Suggestion::default(),
        };
        (suggestion, details)
    }

    pub fn is_success(&self) -> bool {
        self.ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let envelope = Envelope::success(
            "prism",
            "greet",
            Version::new(1, 4, 0),
            serde_json::json!({"message": "hello"}),
            vec![],
        );
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["result"]["message"], "hello");
        assert_eq!(json["meta"]["tool"], "prism.greet");
        assert_eq!(json["meta"]["version"], "1.4.0");
        // No error key on success, no warnings key when empty.
        assert!(json.get("error").is_none());
        assert!(json["meta"].get("warnings").is_none());
    }

    #[test]
    fn test_success_with_warnings() {
        let envelope = Envelope::success(
            "prism",
            "lookup",
            Version::new(1, 4, 0),
            serde_json::Value::Null,
            vec![
                "Use 'search' instead.".to_string(),
                "Scheduled for removal in v2.0.0.".to_string(),
            ],
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["meta"]["warnings"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_failure_shape() {
        let error = InvocationError::Removed {
            command: "lookup".into(),
            removed_in: Version::new(2, 0, 0),
            migration: Some("Use 'search' instead.".into()),
        };
        let envelope = Envelope::failure(&error);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["ok"], false);
        assert!(json.get("result").is_none());
        assert!(json.get("meta").is_none());
        assert_eq!(json["error"]["code"], "E1001");
        assert_eq!(json["error"]["category"], "validation");
        assert_eq!(json["error"]["suggestion"]["action"], "migrate command usage");
        assert_eq!(json["error"]["suggestion"]["fix"], "Use 'search' instead.");
        assert_eq!(json["error"]["details"]["deprecated_version"], "2.0.0");
    }

    #[test]
    fn test_invalid_confirmation_details() {
        let envelope = Envelope::failure(&InvocationError::InvalidConfirmation {
            answer: "maybe".into(),
        });
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"]["code"], "E1008");
        assert!(json["error"]["details"]["accepted"].is_array());
        // Empty suggestion is omitted entirely.
        assert!(json["error"].get("suggestion").is_none());
    }

    #[test]
    fn test_round_trip() {
        let envelope = Envelope::failure(&InvocationError::CommandNotFound {
            token: "x".into(),
        });
        let json = serde_json::to_string(&envelope).unwrap();
        let back: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, envelope);
    }
}
