//! Builtin command set.
//!
//! These are the commands prism ships with. Together they exercise every
//! lifecycle path the registry supports: an unversioned command, a
//! two-version lineage, a destructive command behind the security gate, a
//! deprecated command awaiting removal, and a hidden diagnostic.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use prism_domain::{
    ArgumentMap, Command, CommandHandler, CommandRegistry, HandlerError, ParamType, RegistryError,
    RiskLevel, ToolContext, ToolParameter, Version,
};

/// Register every builtin into the registry.
pub fn register_all(
    registry: &mut CommandRegistry,
    telemetry_path: PathBuf,
) -> Result<(), RegistryError> {
    registry.register(
        Command::new("greet", "Print a friendly greeting", Arc::new(GreetHandler))
            .with_parameter(
                ToolParameter::new("name", "Who to greet", false)
                    .with_type(ParamType::String)
                    .with_default("world"),
            )
            .with_parameter(
                ToolParameter::new("shout", "Uppercase the greeting", false)
                    .with_type(ParamType::Boolean),
            )
            .with_tag("demo"),
    )?;

    registry.register(
        Command::new(
            "search",
            "Search a file for lines containing a query",
            Arc::new(SearchHandler { case_insensitive_supported: false }),
        )
        .with_version(Version::new(1, 0, 0))
        .with_parameter(ToolParameter::new("query", "Text to look for", true))
        .with_parameter(
            ToolParameter::new("path", "File to search", false)
                .with_type(ParamType::Path)
                .with_default("README.md"),
        )
        .with_tag("files"),
    )?;

    registry.register(
        Command::new(
            "search",
            "Search a file for lines containing a query, with matching options",
            Arc::new(SearchHandler { case_insensitive_supported: true }),
        )
        .with_version(Version::new(2, 0, 0))
        .with_parameter(ToolParameter::new("query", "Text to look for", true))
        .with_parameter(
            ToolParameter::new("path", "File to search", false)
                .with_type(ParamType::Path)
                .with_default("README.md"),
        )
        .with_parameter(
            ToolParameter::new("ignore_case", "Case-insensitive matching", false)
                .with_type(ParamType::Boolean),
        )
        .with_parameter(
            ToolParameter::new("limit", "Stop after this many matches", false)
                .with_type(ParamType::Integer)
                .with_default(100),
        )
        .with_tag("files"),
    )?;

    registry.register(
        Command::new(
            "lookup",
            "Search a file for lines containing a query (legacy entry point)",
            Arc::new(SearchHandler { case_insensitive_supported: false }),
        )
        .with_parameter(ToolParameter::new("query", "Text to look for", true))
        .with_parameter(
            ToolParameter::new("path", "File to search", false)
                .with_type(ParamType::Path)
                .with_default("README.md"),
        )
        .deprecated_since("Use 'search' instead.", Version::new(2, 0, 0))
        .with_tag("files"),
    )?;

    registry.register(
        Command::new(
            "purge-telemetry",
            "Delete the local telemetry log",
            Arc::new(PurgeTelemetryHandler {
                path: telemetry_path,
            }),
        )
        .with_risk_level(RiskLevel::High)
        .with_tag("maintenance"),
    )?;

    registry.register(
        Command::new(
            "doctor",
            "Report runtime information for bug reports",
            Arc::new(DoctorHandler),
        )
        .hidden()
        .with_tag("maintenance"),
    )?;

    Ok(())
}

struct GreetHandler;

#[async_trait]
impl CommandHandler for GreetHandler {
    async fn run(
        &self,
        args: &ArgumentMap,
        _ctx: &ToolContext,
    ) -> Result<serde_json::Value, HandlerError> {
        let name = args.get("name").and_then(|v| v.as_str()).unwrap_or("world");
        let mut message = format!("Hello, {}!", name);
        if args.get("shout").and_then(|v| v.as_bool()).unwrap_or(false) {
            message = message.to_uppercase();
        }
        Ok(serde_json::json!({ "output": message }))
    }
}

struct SearchHandler {
    case_insensitive_supported: bool,
}

#[async_trait]
impl CommandHandler for SearchHandler {
    async fn run(
        &self,
        args: &ArgumentMap,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, HandlerError> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| HandlerError::InvalidArgument("missing 'query'".into()))?;
        let path = args
            .get("path")
            .and_then(|v| v.as_str())
            .unwrap_or("README.md");
        let ignore_case = self.case_insensitive_supported
            && args
                .get("ignore_case")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
        let limit = args
            .get("limit")
            .and_then(|v| v.as_i64())
            .unwrap_or(i64::MAX)
            .max(0) as usize;

        if ctx.dry_run {
            return Ok(serde_json::json!({
                "dry_run": true,
                "path": path,
                "query": query,
            }));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| HandlerError::Failed(format!("cannot read {}: {}", path, e)))?;

        let needle = if ignore_case {
            query.to_lowercase()
        } else {
            query.to_string()
        };

        let mut matches = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            let haystack = if ignore_case {
                line.to_lowercase()
            } else {
                line.to_string()
            };
            if haystack.contains(&needle) {
                if matches.len() >= limit {
                    break;
                }
                matches.push(serde_json::json!({
                    "line": number + 1,
                    "text": line,
                }));
            }
        }

        Ok(serde_json::json!({
            "path": path,
            "query": query,
            "match_count": matches.len(),
            "matches": matches,
        }))
    }
}

struct PurgeTelemetryHandler {
    path: PathBuf,
}

#[async_trait]
impl CommandHandler for PurgeTelemetryHandler {
    async fn run(
        &self,
        _args: &ArgumentMap,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, HandlerError> {
        if ctx.dry_run {
            return Ok(serde_json::json!({
                "dry_run": true,
                "path": self.path.display().to_string(),
            }));
        }

        let existed = self.path.exists();
        if existed {
            std::fs::remove_file(&self.path)
                .map_err(|e| HandlerError::Failed(format!("cannot remove log: {}", e)))?;
        }

        Ok(serde_json::json!({
            "output": if existed {
                format!("Removed {}", self.path.display())
            } else {
                "Nothing to remove.".to_string()
            },
        }))
    }
}

struct DoctorHandler;

#[async_trait]
impl CommandHandler for DoctorHandler {
    async fn run(
        &self,
        _args: &ArgumentMap,
        _ctx: &ToolContext,
    ) -> Result<serde_json::Value, HandlerError> {
        Ok(serde_json::json!({
            "app": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry, PathBuf::from("/tmp/prism-test-telemetry.jsonl")).unwrap();
        registry
    }

    #[test]
    fn test_register_all_lineages() {
        let registry = registry();

        // Bare token resolves the latest search.
        let latest = registry.resolve("search").unwrap();
        assert_eq!(latest.version, Some(Version::new(2, 0, 0)));
        assert!(registry.resolve("search-v1.0.0").is_some());

        // Deprecated and destructive entries present.
        assert!(registry.resolve("lookup").unwrap().deprecated);
        assert_eq!(
            registry.resolve("purge-telemetry").unwrap().risk_level,
            RiskLevel::High
        );
        assert!(registry.resolve("doctor").unwrap().hidden);
    }

    #[tokio::test]
    async fn test_greet_handler() {
        let mut args = ArgumentMap::new();
        args.insert("name".into(), serde_json::json!("Ada"));
        args.insert("shout".into(), serde_json::json!(true));

        let out = GreetHandler
            .run(&args, &ToolContext::new())
            .await
            .unwrap();
        assert_eq!(out["output"], "HELLO, ADA!");
    }

    #[tokio::test]
    async fn test_search_handler_matches_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "alpha line\nbeta line\nALPHA again").unwrap();

        let handler = SearchHandler {
            case_insensitive_supported: true,
        };
        let mut args = ArgumentMap::new();
        args.insert("query".into(), serde_json::json!("alpha"));
        args.insert("path".into(), serde_json::json!(path.to_str().unwrap()));
        args.insert("ignore_case".into(), serde_json::json!(true));

        let out = handler.run(&args, &ToolContext::new()).await.unwrap();
        assert_eq!(out["match_count"], 2);
        assert_eq!(out["matches"][0]["line"], 1);
    }

    #[tokio::test]
    async fn test_search_v1_ignores_case_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, "ALPHA\n").unwrap();

        let handler = SearchHandler {
            case_insensitive_supported: false,
        };
        let mut args = ArgumentMap::new();
        args.insert("query".into(), serde_json::json!("alpha"));
        args.insert("path".into(), serde_json::json!(path.to_str().unwrap()));
        args.insert("ignore_case".into(), serde_json::json!(true));

        let out = handler.run(&args, &ToolContext::new()).await.unwrap();
        assert_eq!(out["match_count"], 0);
    }

    #[tokio::test]
    async fn test_purge_telemetry_handler() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        std::fs::write(&path, "{}\n").unwrap();

        let handler = PurgeTelemetryHandler { path: path.clone() };
        handler
            .run(&ArgumentMap::new(), &ToolContext::new())
            .await
            .unwrap();
        assert!(!path.exists());

        // Second run is a no-op, not an error.
        let out = handler
            .run(&ArgumentMap::new(), &ToolContext::new())
            .await
            .unwrap();
        assert_eq!(out["output"], "Nothing to remove.");
    }

    #[tokio::test]
    async fn test_purge_telemetry_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        std::fs::write(&path, "{}\n").unwrap();

        let handler = PurgeTelemetryHandler { path: path.clone() };
        let out = handler
            .run(&ArgumentMap::new(), &ToolContext::new().with_dry_run(true))
            .await
            .unwrap();
        assert_eq!(out["dry_run"], true);
        assert!(path.exists());
    }
}
