//! Tool-manifest export for agent integration.
//!
//! Wraps the same per-tool objects as the schema export in a manifest
//! frame carrying the app identity, so an agent can ingest the whole
//! surface in one document.

use prism_domain::{ToolDef, Version};

use super::schema::tool_to_schema;

/// Manifest document schema version.
const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Export the view as a tool manifest.
pub fn export_manifest(app: &str, app_version: Version, view: &[ToolDef]) -> serde_json::Value {
    let mut tools: Vec<&ToolDef> = view.iter().collect();
    tools.sort_by_key(|t| &t.name);

    serde_json::json!({
        "schema_version": MANIFEST_SCHEMA_VERSION,
        "app": app,
        "version": app_version.to_string(),
        "tools": tools.into_iter().map(tool_to_schema).collect::<Vec<_>>(),
    })
}
