//! Tool entities: the portable projection consumed by views and exports.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::command::entities::CommandHandler;
use crate::core::version::Version;

/// Risk level of a tool operation.
///
/// `High` marks a destructive command — one performing an irreversible or
/// high-impact action — and subjects it to the security gate before the
/// handler may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }

    /// Destructive commands must pass the confirmation gate.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type tag for a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Path,
}

impl ParamType {
    /// JSON Schema type name for export surfaces.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::String | ParamType::Path => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }
}

/// Declared parameter descriptor.
///
/// The single source of truth for both the argument parser and every export
/// schema; built statically at registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub param_type: ParamType,
    /// Filled in by the pipeline when the argument is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::String,
            default: None,
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    pub fn with_default(mut self, default: impl Into<serde_json::Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// One invocable operation as seen by a view.
///
/// `name` is the *exposed* identifier — after alias generation and any
/// namespace transform — independent of the originating command's
/// `(base_name, version)` pair, which is carried separately so transforms
/// like the version filter never have to re-parse names. ToolDefs are
/// created fresh per view build and never mutated afterwards; transforms
/// produce new instances.
#[derive(Clone)]
pub struct ToolDef {
    /// Exposed identifier used for dispatch and export.
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
    pub hidden: bool,
    pub tags: BTreeSet<String>,
    pub risk_level: RiskLevel,
    /// Free-form metadata surfaced verbatim by exports.
    pub metadata: HashMap<String, serde_json::Value>,
    /// Registry projection: logical name shared across versions.
    pub base_name: Option<String>,
    /// Registry projection: this revision's version.
    pub version: Option<Version>,
    pub deprecated: bool,
    pub deprecated_message: Option<String>,
    pub deprecated_version: Option<Version>,
    /// The operation behind this tool.
    pub handler: Arc<dyn CommandHandler>,
}

impl ToolDef {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            hidden: false,
            tags: BTreeSet::new(),
            risk_level: RiskLevel::Low,
            metadata: HashMap::new(),
            base_name: None,
            version: None,
            deprecated: false,
            deprecated_message: None,
            deprecated_version: None,
            handler,
        }
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

    /// Copy of this tool under a different exposed name; everything else
    /// unchanged. The building block for namespace/alias derivation.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut def = self.clone();
        def.name = name.into();
        def
    }

    /// Evaluate this tool's deprecation lifecycle against the host version.
    pub fn lifecycle(&self, host_version: Version) -> crate::command::registry::LifecycleState {
        crate::command::registry::evaluate_lifecycle(
            self.deprecated,
            self.deprecated_version,
            host_version,
        )
    }
}

impl fmt::Debug for ToolDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDef")
            .field("name", &self.name)
            .field("hidden", &self.hidden)
            .field("risk_level", &self.risk_level)
            .field("version", &self.version)
            .field("deprecated", &self.deprecated)
            .finish_non_exhaustive()
    }
}
