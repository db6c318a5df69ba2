//! Execution-scoped invocation context.

use std::collections::{BTreeSet, HashMap};

/// How the caller wants the envelope rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

/// Immutable snapshot of invocation-level flags.
///
/// Created once per invocation, owned by the pipeline, dropped at the end
/// of the call. The pipeline itself enforces nothing from `timeout_ms`; it
/// is recorded for the handler to honor voluntarily.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    pub quiet: bool,
    pub verbose: bool,
    pub dry_run: bool,
    pub force: bool,
    pub yes: bool,
    pub idempotency_key: Option<String>,
    pub timeout_ms: Option<u64>,
    pub response_format: ResponseFormat,
    /// Granted authorization scopes, opaque to the pipeline.
    pub auth: BTreeSet<String>,
    pub extra: HashMap<String, serde_json::Value>,
}

impl ToolContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_yes(mut self, yes: bool) -> Self {
        self.yes = yes;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.auth = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.auth.contains(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = ToolContext::new();
        assert!(!ctx.force);
        assert!(!ctx.yes);
        assert!(ctx.timeout_ms.is_none());
        assert_eq!(ctx.response_format, ResponseFormat::Text);
    }

    #[test]
    fn test_builder_chain() {
        let ctx = ToolContext::new()
            .with_force(true)
            .with_timeout_ms(5_000)
            .with_scopes(["tools:run", "tools:admin"])
            .with_extra("trace_id", serde_json::json!("abc"));

        assert!(ctx.force);
        assert_eq!(ctx.timeout_ms, Some(5_000));
        assert!(ctx.has_scope("tools:run"));
        assert!(!ctx.has_scope("tools:write"));
        assert_eq!(ctx.extra["trace_id"], "abc");
    }
}
