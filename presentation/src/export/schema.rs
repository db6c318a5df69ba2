//! JSON Schema export.
//!
//! Produces one provider-neutral schema object per tool:
//!
//! ```json
//! {
//!   "name": "search",
//!   "description": "Search the corpus",
//!   "input_schema": { "type": "object", "properties": { ... }, "required": [ ... ] },
//!   "hidden": false,
//!   "version": "2.0.0",
//!   "deprecated": true,
//!   "deprecated_message": "...",
//!   "deprecated_version": "3.0.0"
//! }
//! ```
//!
//! Version and deprecation fields appear only when present on the tool.

use prism_domain::ToolDef;

/// Convert one tool into its export schema object.
pub fn tool_to_schema(tool: &ToolDef) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for param in &tool.parameters {
        let mut prop = serde_json::Map::new();
        prop.insert(
            "type".to_string(),
            serde_json::json!(param.param_type.json_type()),
        );
        prop.insert(
            "description".to_string(),
            serde_json::json!(param.description),
        );
        if let Some(default) = &param.default {
            prop.insert("default".to_string(), default.clone());
        }
        properties.insert(param.name.clone(), serde_json::Value::Object(prop));

        if param.required {
            required.push(serde_json::json!(param.name));
        }
    }

    let mut schema = serde_json::Map::new();
    schema.insert("name".to_string(), serde_json::json!(tool.name));
    schema.insert(
        "description".to_string(),
        serde_json::json!(tool.description),
    );
    schema.insert(
        "input_schema".to_string(),
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    );
    schema.insert("hidden".to_string(), serde_json::json!(tool.hidden));
    if !tool.tags.is_empty() {
        schema.insert("tags".to_string(), serde_json::json!(tool.tags));
    }
    if let Some(version) = tool.version {
        schema.insert("version".to_string(), serde_json::json!(version.to_string()));
    }
    if tool.deprecated {
        schema.insert("deprecated".to_string(), serde_json::json!(true));
        if let Some(message) = &tool.deprecated_message {
            schema.insert("deprecated_message".to_string(), serde_json::json!(message));
        }
        if let Some(version) = tool.deprecated_version {
            schema.insert(
                "deprecated_version".to_string(),
                serde_json::json!(version.to_string()),
            );
        }
    }

    serde_json::Value::Object(schema)
}

/// Export the full view, sorted by exposed name.
pub fn export_schema(view: &[ToolDef]) -> serde_json::Value {
    let mut tools: Vec<&ToolDef> = view.iter().collect();
    tools.sort_by_key(|t| &t.name);
    serde_json::Value::Array(tools.into_iter().map(tool_to_schema).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prism_domain::{
        ArgumentMap, CommandHandler, HandlerError, ParamType, ToolContext, ToolParameter, Version,
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

    fn search_tool() -> ToolDef {
        ToolDef::new("search", "Search the corpus", Arc::new(NullHandler))
            .with_parameter(ToolParameter::new("query", "Search query", true))
            .with_parameter(
                ToolParameter::new("limit", "Max results", false)
                    .with_type(ParamType::Integer)
                    .with_default(10),
            )
    }

    #[test]
    fn test_tool_schema_shape() {
        let schema = tool_to_schema(&search_tool());

        assert_eq!(schema["name"], "search");
        assert_eq!(schema["input_schema"]["type"], "object");
        assert_eq!(
            schema["input_schema"]["properties"]["query"]["type"],
            "string"
        );
        assert_eq!(
            schema["input_schema"]["properties"]["limit"]["type"],
            "integer"
        );
        assert_eq!(
            schema["input_schema"]["properties"]["limit"]["default"],
            10
        );

        let required = schema["input_schema"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "query");

        // Optional fields absent when not set.
        assert!(schema.get("version").is_none());
        assert!(schema.get("deprecated").is_none());
    }

    #[test]
    fn test_version_and_deprecation_fields() {
        let mut tool = search_tool();
        tool.version = Some(Version::new(1, 0, 0));
        tool.deprecated = true;
        tool.deprecated_message = Some("Use v2.".into());
        tool.deprecated_version = Some(Version::new(2, 0, 0));

        let schema = tool_to_schema(&tool);
        assert_eq!(schema["version"], "1.0.0");
        assert_eq!(schema["deprecated"], true);
        assert_eq!(schema["deprecated_message"], "Use v2.");
        assert_eq!(schema["deprecated_version"], "2.0.0");
    }

    #[test]
    fn test_export_sorted_by_name() {
        let view = vec![
            ToolDef::new("zeta", "Z", Arc::new(NullHandler)),
            search_tool(),
            ToolDef::new("alpha", "A", Arc::new(NullHandler)),
        ];
        let exported = export_schema(&view);
        let names: Vec<&str> = exported
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["alpha", "search", "zeta"]);
    }

    #[test]
    fn test_hidden_flag_rendered_verbatim() {
        // The exporter reports what the view contains; filtering happened
        // upstream in the transform chain.
        let tool = ToolDef::new("ghost", "Hidden", Arc::new(NullHandler)).hidden();
        assert_eq!(tool_to_schema(&tool)["hidden"], true);
    }
}
