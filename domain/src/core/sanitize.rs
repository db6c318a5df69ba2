//! Output sanitizer.
//!
//! Every string that leaves the invocation pipeline — whether rendered as
//! terminal text or embedded in a JSON envelope — passes through three
//! ordered passes:
//!
//! 1. ANSI/terminal escape sequences are stripped (CSI and OSC forms).
//! 2. Non-printable control characters are stripped (newline and tab
//!    survive).
//! 3. Shell-injection-shaped substrings are replaced with `[REDACTED]`:
//!    command substitution `$(...)`, parameter expansion `${...}`, process
//!    substitution `<(...)` / `>(...)`, and backtick command substitution.
//!
//! # Backtick discriminator
//!
//! Documentation strings legitimately carry backtick-quoted generic-type
//! notation such as `` `Name[T]` ``. A backtick span is treated as a shell
//! command — and redacted — only if its contents contain whitespace or one
//! of the metacharacters `$`, `;`, `|`, `&`. A single
//! identifier-with-brackets token never matches, so `` `Name[T]` `` and
//! `` `foo()` `` survive unchanged while `` `rm -rf /` `` is redacted.

use regex::Regex;
use std::sync::LazyLock;

/// Replacement marker for redacted substrings.
pub const REDACTION_MARKER: &str = "[REDACTED]";

static ANSI_CSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("static pattern"));

static ANSI_OSC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)").expect("static pattern"));

static COMMAND_SUBST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\([^)]*\)").expect("static pattern"));

static BRACE_EXPANSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").expect("static pattern"));

static PROCESS_SUBST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[<>]\([^)]*\)").expect("static pattern"));

static BACKTICK_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]*`").expect("static pattern"));

/// Sanitize one string through all three passes, in order.
pub fn sanitize(input: &str) -> String {
    let stripped = strip_ansi(input);
    let printable = strip_control(&stripped);
    redact_shell(&printable)
}

/// Pass 1: remove ANSI escape sequences.
fn strip_ansi(input: &str) -> String {
    let without_csi = ANSI_CSI.replace_all(input, "");
    ANSI_OSC.replace_all(&without_csi, "").into_owned()
}

/// Pass 2: remove non-printable control characters.
///
/// Newlines and tabs survive; carriage returns and any ESC left over from
/// a malformed sequence do not.
fn strip_control(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Pass 3: redact shell-injection-shaped substrings.
fn redact_shell(input: &str) -> String {
    let step = COMMAND_SUBST.replace_all(input, REDACTION_MARKER);
    let step = BRACE_EXPANSION.replace_all(&step, REDACTION_MARKER);
    let step = PROCESS_SUBST.replace_all(&step, REDACTION_MARKER);
    BACKTICK_SPAN
        .replace_all(&step, |caps: &regex::Captures<'_>| {
            let span = &caps[0];
            if backtick_span_is_command(span) {
                REDACTION_MARKER.to_string()
            } else {
                span.to_string()
            }
        })
        .into_owned()
}

/// The documented discriminator: a backtick span is a shell command iff its
/// contents hold whitespace or one of `$ ; | &`.
fn backtick_span_is_command(span: &str) -> bool {
    let inner = span.trim_matches('`');
    inner
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '$' | ';' | '|' | '&'))
}

/// Recursively sanitize every string leaf of a JSON value.
///
/// Objects and arrays are walked in place; all other leaves pass through
/// untouched. Set-like data must already be serialized in stable order
/// (BTree collections) by the time it reaches this function.
pub fn sanitize_value(value: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::String(s) => Value::String(sanitize(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), sanitize_value(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_ansi_sequences() {
        assert_eq!(sanitize("\x1b[31mred\x1b[0m text"), "red text");
        assert_eq!(sanitize("\x1b]0;title\x07body"), "body");
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize("a\x00b\x08c"), "abc");
        assert_eq!(sanitize("line1\nline2\tend"), "line1\nline2\tend");
        assert_eq!(sanitize("a\rb"), "ab");
    }

    #[test]
    fn test_redacts_command_substitution() {
        let out = sanitize("run $(rm -rf /) now");
        assert!(!out.contains("$("));
        assert_eq!(out, format!("run {} now", REDACTION_MARKER));
    }

    #[test]
    fn test_redacts_brace_expansion() {
        let out = sanitize("home is ${HOME}");
        assert!(!out.contains("${"));
        assert_eq!(out, format!("home is {}", REDACTION_MARKER));
    }

    #[test]
    fn test_redacts_process_substitution() {
        assert_eq!(
            sanitize("diff <(ls a) >(ls b)"),
            format!("diff {} {}", REDACTION_MARKER, REDACTION_MARKER)
        );
    }

    #[test]
    fn test_redacts_backtick_command() {
        let out = sanitize("danger: `rm -rf /`");
        assert_eq!(out, format!("danger: {}", REDACTION_MARKER));
    }

    #[test]
    fn test_preserves_backtick_generic_syntax() {
        assert_eq!(sanitize("returns a `Name[T]` wrapper"), "returns a `Name[T]` wrapper");
        assert_eq!(sanitize("call `parse()` first"), "call `parse()` first");
    }

    #[test]
    fn test_backtick_metacharacters_redacted() {
        assert_eq!(sanitize("`a|b`"), REDACTION_MARKER);
        assert_eq!(sanitize("`$PATH`"), REDACTION_MARKER);
    }

    #[test]
    fn test_sanitize_value_recurses() {
        let value = json!({
            "message": "\x1b[1mok\x1b[0m",
            "items": ["fine", "bad $(x)"],
            "nested": { "inner": "${VAR}" },
            "count": 3,
        });
        let clean = sanitize_value(&value);
        assert_eq!(clean["message"], "ok");
        assert_eq!(clean["items"][0], "fine");
        assert_eq!(clean["items"][1], format!("bad {}", REDACTION_MARKER));
        assert_eq!(clean["nested"]["inner"], REDACTION_MARKER);
        assert_eq!(clean["count"], 3);
    }
}
