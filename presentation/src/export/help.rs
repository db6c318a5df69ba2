//! Interactive tool listing ("agent help" rendering).

use colored::Colorize;

use prism_domain::core::string::summary_line;
use prism_domain::{RiskLevel, ToolDef};

/// Render the view as a human-readable listing, in view order.
pub fn render_tool_list(view: &[ToolDef]) -> String {
    if view.is_empty() {
        return "No tools available.\n".to_string();
    }

    let width = view.iter().map(|t| t.name.len()).max().unwrap_or(0);
    let mut out = String::new();

    for tool in view {
        // Pad before coloring so escape codes don't skew the column.
        let padded = format!("{:width$}", tool.name, width = width);
        let mut line = format!("  {}  {}", padded.bold(), summary_line(&tool.description, 60));
        if tool.risk_level == RiskLevel::High {
            line.push_str(&format!("  {}", "[destructive]".red()));
        }
        if tool.deprecated {
            let note = match tool.deprecated_version {
                Some(v) => format!("[deprecated, removal in v{}]", v),
                None => "[deprecated]".to_string(),
            };
            line.push_str(&format!("  {}", note.yellow()));
        }
        if let Some(version) = tool.version {
            line.push_str(&format!("  {}", format!("v{}", version).dimmed()));
        }
        out.push_str(&line);
        out.push('\n');

        for param in &tool.parameters {
            let requirement = if param.required { "required" } else { "optional" };
            out.push_str(&format!(
                "  {:width$}    --{} <{}> ({}) {}\n",
                "",
                param.name,
                param.param_type.json_type(),
                requirement,
                summary_line(&param.description, 50),
                width = width
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prism_domain::{
        ArgumentMap, CommandHandler, HandlerError, ToolContext, ToolParameter, Version,
    };
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

    #[test]
    fn test_lists_tools_in_view_order() {
        let view = vec![
            ToolDef::new("zeta", "Last alphabetically, first in view", Arc::new(NullHandler)),
            ToolDef::new("alpha", "First alphabetically", Arc::new(NullHandler)),
        ];
        let listing = render_tool_list(&view);
        let zeta = listing.find("zeta").unwrap();
        let alpha = listing.find("alpha").unwrap();
        assert!(zeta < alpha, "view order must be preserved");
    }

    #[test]
    fn test_annotations_present() {
        let mut tool = ToolDef::new("purge", "Remove everything", Arc::new(NullHandler))
            .with_risk_level(RiskLevel::High)
            .with_parameter(ToolParameter::new("target", "What to purge", true));
        tool.deprecated = true;
        tool.deprecated_version = Some(Version::new(2, 0, 0));

        let listing = render_tool_list(&[tool]);
        assert!(listing.contains("[destructive]"));
        assert!(listing.contains("removal in v2.0.0"));
        assert!(listing.contains("--target"));
        assert!(listing.contains("(required)"));
    }

    #[test]
    fn test_empty_view_message() {
        assert_eq!(render_tool_list(&[]), "No tools available.\n");
    }
}
