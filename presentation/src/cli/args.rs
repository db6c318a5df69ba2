//! Dynamic argument parsing for dispatched commands.
//!
//! The argument parser itself is an external collaborator: given a
//! command's declared parameter list, parse the raw process arguments into
//! a typed [`ArgumentMap`] or fail with a user-input error. This adapter
//! builds a runtime `clap` command from the descriptors — one `--flag` per
//! declared parameter — so the descriptor list stays the single source of
//! truth for parsing and export alike.
//!
//! Presence checks for required parameters are deliberately left to the
//! pipeline's validation stage so that every missing-parameter failure
//! carries the same `E1003` taxonomy, whichever surface produced it.

use clap::ArgAction;

use prism_domain::{ArgumentMap, InvocationError, ParamType, ToolDef};

/// Invocation flags accepted after the command token, merged into the
/// context by the dispatcher. A declared tool parameter with the same name
/// shadows the flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineFlags {
    pub force: bool,
    pub yes: bool,
    pub dry_run: bool,
}

/// Parse result: typed arguments plus any inline context flags.
#[derive(Debug)]
pub struct ParsedInvocation {
    pub args: ArgumentMap,
    pub flags: InlineFlags,
}

const INLINE_FLAGS: &[&str] = &["force", "yes", "dry-run"];

/// Parse raw tokens (everything after the command token) against the
/// tool's declared parameters.
pub fn parse_invocation(
    tool: &ToolDef,
    raw: &[String],
) -> Result<ParsedInvocation, InvocationError> {
    // Per-command help lives in `tools list`; a stray --help here would
    // otherwise short-circuit clap with a help "error".
    let mut command = clap::Command::new(tool.name.clone())
        .about(tool.description.clone())
        .no_binary_name(true)
        .disable_help_flag(true);

    for param in &tool.parameters {
        let mut arg = clap::Arg::new(param.name.clone())
            .long(param.name.clone())
            .help(param.description.clone());
        arg = match param.param_type {
            ParamType::Boolean => arg.action(ArgAction::SetTrue),
            _ => arg.action(ArgAction::Set).value_name("VALUE"),
        };
        command = command.arg(arg);
    }

    for flag in INLINE_FLAGS {
        if tool.parameters.iter().any(|p| p.name == *flag) {
            continue;
        }
        command = command.arg(
            clap::Arg::new(format!("__ctx_{}", flag))
                .long(*flag)
                .action(ArgAction::SetTrue)
                .hide(true),
        );
    }

    let matches = command
        .try_get_matches_from(raw)
        .map_err(|e| InvocationError::InvalidArguments {
            command: tool.name.clone(),
            message: e.to_string(),
        })?;

    let mut args = ArgumentMap::new();
    for param in &tool.parameters {
        match param.param_type {
            ParamType::Boolean => {
                if matches.get_flag(&param.name) {
                    args.insert(param.name.clone(), serde_json::json!(true));
                }
            }
            _ => {
                if let Some(value) = matches.get_one::<String>(&param.name) {
                    args.insert(param.name.clone(), typed_value(tool, param.param_type, &param.name, value)?);
                }
            }
        }
    }

    let flag = |name: &str| -> bool {
        let key = format!("__ctx_{}", name);
        matches.try_get_one::<bool>(&key).ok().flatten().copied().unwrap_or(false)
    };
    let flags = InlineFlags {
        force: flag("force"),
        yes: flag("yes"),
        dry_run: flag("dry-run"),
    };

    Ok(ParsedInvocation { args, flags })
}

/// Convert one raw string into the declared type.
fn typed_value(
    tool: &ToolDef,
    param_type: ParamType,
    name: &str,
    raw: &str,
) -> Result<serde_json::Value, InvocationError> {
    let parse_error = |expected: &str| InvocationError::InvalidArguments {
        command: tool.name.clone(),
        message: format!("parameter '{}' expects {}, got '{}'", name, expected, raw),
    };

    match param_type {
        ParamType::String | ParamType::Path => Ok(serde_json::json!(raw)),
        ParamType::Integer => raw
            .parse::<i64>()
            .map(|v| serde_json::json!(v))
            .map_err(|_| parse_error("an integer")),
        ParamType::Number => raw
            .parse::<f64>()
            .map(|v| serde_json::json!(v))
            .map_err(|_| parse_error("a number")),
        ParamType::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(serde_json::json!(true)),
            "false" | "0" | "no" => Ok(serde_json::json!(false)),
            _ => Err(parse_error("a boolean")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prism_domain::{CommandHandler, HandlerError, ToolContext, ToolParameter};
    use std::sync::Arc;

    struct NullHandler;

    #[async_trait]
    impl CommandHandler for NullHandler {
        async fn run(
            &self,
            _args: &ArgumentMap,
            _ctx: &ToolContext,
        ) -> Result<serde_json::Value, HandlerError> {
            Ok(serde_json::Value::Null)
        }
    }

    fn search_tool() -> ToolDef {
        ToolDef::new("search", "Search the corpus", Arc::new(NullHandler))
            .with_parameter(ToolParameter::new("query", "Search query", true))
            .with_parameter(
                ToolParameter::new("limit", "Max results", false).with_type(ParamType::Integer),
            )
            .with_parameter(
                ToolParameter::new("fuzzy", "Fuzzy matching", false).with_type(ParamType::Boolean),
            )
    }

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_typed_parsing() {
        let parsed = parse_invocation(
            &search_tool(),
            &strings(&["--query", "rust", "--limit", "5", "--fuzzy"]),
        )
        .unwrap();

        assert_eq!(parsed.args["query"], "rust");
        assert_eq!(parsed.args["limit"], 5);
        assert_eq!(parsed.args["fuzzy"], true);
    }

    #[test]
    fn test_absent_optional_not_inserted() {
        let parsed = parse_invocation(&search_tool(), &strings(&["--query", "x"])).unwrap();
        assert!(!parsed.args.contains_key("limit"));
        assert!(!parsed.args.contains_key("fuzzy"));
    }

    #[test]
    fn test_type_mismatch_is_invalid_arguments() {
        let err = parse_invocation(
            &search_tool(),
            &strings(&["--query", "x", "--limit", "many"]),
        )
        .unwrap_err();
        assert_eq!(err.code(), "E1003");
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_unknown_flag_is_invalid_arguments() {
        let err = parse_invocation(&search_tool(), &strings(&["--nope", "1"])).unwrap_err();
        assert_eq!(err.code(), "E1003");
    }

    #[test]
    fn test_inline_context_flags_extracted() {
        let parsed = parse_invocation(
            &search_tool(),
            &strings(&["--query", "x", "--force", "--dry-run"]),
        )
        .unwrap();
        assert!(parsed.flags.force);
        assert!(parsed.flags.dry_run);
        assert!(!parsed.flags.yes);
        // Context flags never leak into the argument map.
        assert!(!parsed.args.contains_key("force"));
    }

    #[test]
    fn test_declared_parameter_shadows_inline_flag() {
        let tool = ToolDef::new("odd", "Odd tool", Arc::new(NullHandler)).with_parameter(
            ToolParameter::new("force", "A real parameter", false).with_type(ParamType::Boolean),
        );
        let parsed = parse_invocation(&tool, &strings(&["--force"])).unwrap();
        assert_eq!(parsed.args["force"], true);
        assert!(!parsed.flags.force);
    }

    #[test]
    fn test_missing_required_is_left_to_pipeline() {
        // The parser itself accepts the empty invocation; the pipeline's
        // validation stage reports E1003 with its uniform message.
        let parsed = parse_invocation(&search_tool(), &[]).unwrap();
        assert!(parsed.args.is_empty());
    }
}
