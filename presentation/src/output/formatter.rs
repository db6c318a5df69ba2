//! Console formatter for invocation envelopes.
//!
//! Both renderings carry the same sanitized envelope content; the JSON
//! form is the envelope serialized verbatim, the text form is a
//! human-oriented projection of the same fields.

use colored::Colorize;

use prism_domain::{Envelope, ErrorObject};

/// Renders envelopes as text or JSON strings.
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The structured surface: the envelope itself, pretty-printed.
    pub fn format_json(envelope: &Envelope) -> String {
        serde_json::to_string_pretty(envelope)
            .unwrap_or_else(|e| format!(r#"{{"ok":false,"error":{{"code":"E5000","message":"envelope serialization failed: {}","category":"internal"}}}}"#, e))
    }

    /// The human surface.
    pub fn format_text(envelope: &Envelope) -> String {
        if envelope.ok {
            Self::format_success(envelope)
        } else {
            match &envelope.error {
                Some(error) => Self::format_error(error),
                None => String::new(),
            }
        }
    }

    fn format_success(envelope: &Envelope) -> String {
        let mut out = String::new();

        if let Some(meta) = &envelope.meta {
            for warning in &meta.warnings {
                out.push_str(&format!("{} {}\n", "warning:".yellow().bold(), warning));
            }
        }

        match &envelope.result {
            // A bare "output" string renders as plain text; anything else
            // as pretty JSON.
            Some(serde_json::Value::Object(map))
                if map.get("output").is_some_and(|v| v.is_string()) && map.len() <= 2 =>
            {
                if let Some(serde_json::Value::String(s)) = map.get("output") {
                    out.push_str(s);
                    out.push('\n');
                }
            }
            Some(serde_json::Value::String(s)) => {
                out.push_str(s);
                out.push('\n');
            }
            Some(value) => {
                out.push_str(
                    &serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
                );
                out.push('\n');
            }
            None => {}
        }

        out
    }

    fn format_error(error: &ErrorObject) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{} {}\n",
            format!("error[{}]:", error.code).red().bold(),
            error.message
        ));
        out.push_str(&format!("  category: {}\n", error.category));

        if let Some(action) = &error.suggestion.action {
            out.push_str(&format!("  {} {}\n", "hint:".cyan(), action));
        }
        if let Some(fix) = &error.suggestion.fix {
            out.push_str(&format!("        {}\n", fix));
        }
        if let Some(example) = &error.suggestion.example {
            out.push_str(&format!("        e.g. {}\n", example));
        }

        if !error.details.is_empty() {
            let details = serde_json::to_string(&error.details)
                .unwrap_or_else(|_| "{}".to_string());
            out.push_str(&format!("  details: {}\n", details));
        }

        out
    }
}
