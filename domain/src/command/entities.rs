//! Command entities: the registered operation and its handler seam.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::core::version::Version;
use crate::invocation::context::ToolContext;
use crate::tool::entities::{RiskLevel, ToolParameter};

/// Parsed, typed arguments for one invocation: parameter name → value.
pub type ArgumentMap = HashMap<String, serde_json::Value>;

/// Failure raised by a command handler.
///
/// The invocation pipeline classifies these into the envelope error
/// taxonomy: `InvalidArgument` surfaces as a validation failure (exit 2),
/// everything else as an internal error (exit 70).
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler rejected its input (maps to `E1003`).
    #[error("{0}")]
    InvalidArgument(String),

    /// The handler failed mid-operation (maps to `E5000`).
    #[error("{0}")]
    Failed(String),
}

/// The callback behind a command.
///
/// Handlers receive the validated argument map and the execution-scoped
/// [`ToolContext`], and return a JSON value that the pipeline sanitizes and
/// wraps in the result envelope.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(
        &self,
        args: &ArgumentMap,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, HandlerError>;
}

/// One registered operation.
///
/// At most one `Command` may exist per `(base_name, version)` pair, and an
/// unversioned command may not share a base name with versioned ones — the
/// registry enforces both at registration time.
#[derive(Clone)]
pub struct Command {
    /// Logical name shared across all versions (e.g. `search`).
    pub base_name: String,
    /// Optional semantic version of this revision.
    pub version: Option<Version>,
    /// Human-readable help text.
    pub description: String,
    /// Explicit parameter descriptors, built once at registration — never
    /// derived from the handler by introspection.
    pub parameters: Vec<ToolParameter>,
    /// Excluded from default views.
    pub hidden: bool,
    /// Audience/visibility tags.
    pub tags: BTreeSet<String>,
    /// `High` marks a destructive command subject to the security gate.
    pub risk_level: RiskLevel,
    pub deprecated: bool,
    pub deprecated_message: Option<String>,
    /// Host application version at which this command becomes unreachable.
    pub deprecated_version: Option<Version>,
    /// The operation itself.
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new(
        base_name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            version: None,
            description: description.into(),
            parameters: Vec::new(),
            hidden: false,
            tags: BTreeSet::new(),
            risk_level: RiskLevel::Low,
            deprecated: false,
            deprecated_message: None,
            deprecated_version: None,
            handler,
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark this command deprecated, to be removed at `removal_version`.
    pub fn deprecated_since(
        mut self,
        message: impl Into<String>,
        removal_version: Version,
    ) -> Self {
        self.deprecated = true;
        self.deprecated_message = Some(message.into());
        self.deprecated_version = Some(removal_version);
        self
    }

    /// The pinned dispatch token for a versioned command
    /// (`{base_name}-v{version}`), or the bare name when unversioned.
    pub fn pinned_token(&self) -> String {
        match self.version {
            Some(v) => format!("{}-v{}", self.base_name, v),
            None => self.base_name.clone(),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("base_name", &self.base_name)
            .field("version", &self.version)
            .field("hidden", &self.hidden)
            .field("risk_level", &self.risk_level)
            .field("deprecated", &self.deprecated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ParamType;

    struct EchoHandler;

    #[async_trait]
    impl CommandHandler for EchoHandler {
        async fn run(
            &self,
            args: &ArgumentMap,
            _ctx: &ToolContext,
        ) -> Result<serde_json::Value, HandlerError> {
            Ok(serde_json::json!({ "echoed": args.len() }))
        }
    }

    #[test]
    fn test_builder_defaults() {
        let cmd = Command::new("greet", "Greet someone", Arc::new(EchoHandler));
        assert_eq!(cmd.base_name, "greet");
        assert!(cmd.version.is_none());
        assert!(!cmd.hidden);
        assert_eq!(cmd.risk_level, RiskLevel::Low);
        assert!(!cmd.deprecated);
    }

    #[test]
    fn test_pinned_token() {
        let bare = Command::new("greet", "Greet", Arc::new(EchoHandler));
        assert_eq!(bare.pinned_token(), "greet");

        let pinned = Command::new("search", "Search", Arc::new(EchoHandler))
            .with_version(Version::new(1, 2, 0));
        assert_eq!(pinned.pinned_token(), "search-v1.2.0");
    }

    #[test]
    fn test_deprecated_since() {
        let cmd = Command::new("lookup", "Old search", Arc::new(EchoHandler))
            .deprecated_since("Use 'search' instead.", Version::new(2, 0, 0));
        assert!(cmd.deprecated);
        assert_eq!(cmd.deprecated_version, Some(Version::new(2, 0, 0)));
        assert_eq!(cmd.deprecated_message.as_deref(), Some("Use 'search' instead."));
    }

    #[tokio::test]
    async fn test_handler_runs() {
        let cmd = Command::new("probe", "Probe", Arc::new(EchoHandler)).with_parameter(
            ToolParameter::new("target", "Target name", true).with_type(ParamType::String),
        );
        let mut args = ArgumentMap::new();
        args.insert("target".into(), serde_json::json!("x"));
        let out = cmd.handler.run(&args, &ToolContext::default()).await.unwrap();
        assert_eq!(out["echoed"], 1);
    }
}
