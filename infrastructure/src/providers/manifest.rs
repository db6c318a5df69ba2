//! Manifest-driven tool provider.
//!
//! Reads tool definitions from a TOML manifest and exposes them as
//! first-class tools. Each manifest tool wraps a shell command template
//! with `{param_name}` placeholders; parameter values are shell-escaped
//! before substitution.
//!
//! The provider polls its source with a reload-if-changed check: each view
//! build compares the manifest file's modification timestamp against the
//! cached stamp and re-parses only on change. This replaces dynamic code
//! loading with declarative registration — no arbitrary code execution.
//!
//! # Example Manifest
//!
//! ```toml
//! [tools.disk_usage]
//! description = "Report disk usage for a path"
//! command = "du -sh {path}"
//! risk_level = "low"
//! tags = ["system"]
//!
//! [tools.disk_usage.parameters.path]
//! type = "path"
//! description = "Directory to measure"
//! required = true
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::{debug, warn};

use prism_domain::{
    ArgumentMap, CommandHandler, HandlerError, ParamType, ProviderError, RiskLevel, ToolContext,
    ToolDef, ToolParameter, ToolProvider,
};

/// Cap on captured output (1 MB).
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// One `[tools.<name>.parameters.<pname>]` entry.
#[derive(Debug, Clone, Deserialize)]
struct ManifestParameter {
    #[serde(rename = "type", default)]
    param_type: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    default: Option<serde_json::Value>,
}

/// One `[tools.<name>]` entry.
#[derive(Debug, Clone, Deserialize)]
struct ManifestTool {
    description: String,
    command: String,
    /// Defaults to high (safe side).
    #[serde(default)]
    risk_level: Option<String>,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    parameters: HashMap<String, ManifestParameter>,
}

#[derive(Debug, Clone, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    tools: HashMap<String, ManifestTool>,
}

/// Result of a reload-if-changed poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Source stamp matches the cache; the cached list is current.
    Unchanged,
    /// Source was re-parsed; carries the fresh tool count.
    Reloaded(usize),
}

#[derive(Default)]
struct Cache {
    stamp: Option<SystemTime>,
    tools: Vec<ToolDef>,
}

/// Provider for manifest-declared command-template tools.
pub struct ManifestToolProvider {
    id: String,
    path: PathBuf,
    cache: Mutex<Cache>,
}

impl ManifestToolProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            id: format!("manifest:{}", path.display()),
            path,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Compare the source stamp against the cache and re-parse on change.
    pub fn reload_if_changed(&self) -> Result<ReloadOutcome, ProviderError> {
        let stamp = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(|e| {
                ProviderError::NotAvailable(format!("{}: {}", self.path.display(), e))
            })?;

        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if cache.stamp == Some(stamp) {
            return Ok(ReloadOutcome::Unchanged);
        }

        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::DiscoveryFailed(format!("{}: {}", self.path.display(), e))
        })?;
        let manifest: ManifestFile = toml::from_str(&text).map_err(|e| {
            ProviderError::DiscoveryFailed(format!("{}: {}", self.path.display(), e))
        })?;

        let tools = build_tools(&manifest);
        debug!(
            manifest = %self.path.display(),
            tools = tools.len(),
            "manifest reloaded"
        );

        cache.stamp = Some(stamp);
        cache.tools = tools;
        Ok(ReloadOutcome::Reloaded(cache.tools.len()))
    }
}

#[async_trait]
impl ToolProvider for ManifestToolProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn tools(&self) -> Result<Vec<ToolDef>, ProviderError> {
        self.reload_if_changed()?;
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        Ok(cache.tools.clone())
    }
}

/// Convert a parsed manifest into tool definitions, dropping entries whose
/// program is not installed.
fn build_tools(manifest: &ManifestFile) -> Vec<ToolDef> {
    // Sort by name for deterministic ordering
    let mut entries: Vec<(&String, &ManifestTool)> = manifest.tools.iter().collect();
    entries.sort_by_key(|(name, _)| name.as_str());

    let mut tools = Vec::new();
    for (name, config) in entries {
        if let Some(program) = config.command.split_whitespace().next() {
            if which::which(program).is_err() {
                warn!(tool = %name, program, "manifest tool program not installed, skipping");
                continue;
            }
        }

        let risk_level = match config.risk_level.as_deref().map(str::to_ascii_lowercase) {
            Some(s) if s == "low" => RiskLevel::Low,
            _ => RiskLevel::High,
        };

        let handler = Arc::new(ShellCommandHandler {
            template: config.command.clone(),
        });

        let mut def = ToolDef::new(name, &config.description, handler)
            .with_risk_level(risk_level);
        if config.hidden {
            def = def.hidden();
        }
        for tag in &config.tags {
            def = def.with_tag(tag);
        }

        let mut params: Vec<(&String, &ManifestParameter)> = config.parameters.iter().collect();
        params.sort_by_key(|(pname, _)| pname.as_str());
        for (pname, pconfig) in params {
            let mut param = ToolParameter::new(pname, &pconfig.description, pconfig.required)
                .with_type(parse_param_type(pconfig.param_type.as_deref()));
            if let Some(default) = &pconfig.default {
                param = param.with_default(default.clone());
            }
            def = def.with_parameter(param);
        }

        tools.push(def);
    }
    tools
}

fn parse_param_type(tag: Option<&str>) -> ParamType {
    match tag.map(str::to_ascii_lowercase).as_deref() {
        Some("integer") => ParamType::Integer,
        Some("number") => ParamType::Number,
        Some("boolean") => ParamType::Boolean,
        Some("path") => ParamType::Path,
        _ => ParamType::String,
    }
}

/// Handler executing a shell command template.
struct ShellCommandHandler {
    template: String,
}

#[async_trait]
impl CommandHandler for ShellCommandHandler {
    async fn run(
        &self,
        args: &ArgumentMap,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, HandlerError> {
        let command_str = build_command(&self.template, args);

        if ctx.dry_run {
            return Ok(serde_json::json!({
                "dry_run": true,
                "command": command_str,
            }));
        }

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = ProcessCommand::new("cmd");
            c.args(["/C", &command_str]);
            c
        } else {
            let mut c = ProcessCommand::new("sh");
            c.args(["-c", &command_str]);
            c
        };

        let output = cmd
            .output()
            .map_err(|e| HandlerError::Failed(format!("failed to execute command: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = &stdout[..stdout.len().min(MAX_OUTPUT_SIZE)];
        let stderr = &stderr[..stderr.len().min(MAX_OUTPUT_SIZE)];

        if !output.status.success() {
            let detail = if stderr.is_empty() { stdout } else { stderr };
            return Err(HandlerError::Failed(format!(
                "command exited with {:?}: {}",
                output.status.code(),
                detail.trim()
            )));
        }

        Ok(serde_json::json!({
            "output": stdout.trim_end(),
            "exit_code": output.status.code().unwrap_or(0),
        }))
    }
}

/// Substitute `{param_name}` placeholders with shell-escaped values;
/// unfilled placeholders are dropped.
fn build_command(template: &str, args: &ArgumentMap) -> String {
    let mut command = template.to_string();

    for (key, value) in args {
        let placeholder = format!("{{{}}}", key);
        let value_str = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        command = command.replace(&placeholder, &shell_escape(&value_str));
    }

    // Remove leftover {word} placeholders for optional params not provided.
    let mut result = String::with_capacity(command.len());
    let mut chars = command.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '{' {
            result.push(ch);
            continue;
        }
        let mut span = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            span.push(c);
        }
        let is_placeholder = closed
            && !span.is_empty()
            && span.chars().all(|c| c.is_alphanumeric() || c == '_');
        if !is_placeholder {
            result.push('{');
            result.push_str(&span);
            if closed {
                result.push('}');
            }
        }
    }
    result
}

/// Escape a string for safe shell substitution.
fn shell_escape(s: &str) -> String {
    if s.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
    {
        return s.to_string();
    }

    if cfg!(target_os = "windows") {
        let mut escaped = String::with_capacity(s.len() + 4);
        escaped.push('"');
        for ch in s.chars() {
            match ch {
                '"' => escaped.push_str("\\\""),
                '%' => escaped.push_str("%%"),
                '!' => escaped.push_str("^!"),
                _ => escaped.push(ch),
            }
        }
        escaped.push('"');
        escaped
    } else {
        let mut escaped = String::with_capacity(s.len() + 4);
        escaped.push('\'');
        for ch in s.chars() {
            if ch == '\'' {
                escaped.push_str("'\\''");
            } else {
                escaped.push(ch);
            }
        }
        escaped.push('\'');
        escaped
    }
}
