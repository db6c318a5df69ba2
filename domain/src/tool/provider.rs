//! Tool provider abstraction.
//!
//! A [`ToolProvider`] is any source of [`ToolDef`]s: the command registry's
//! own projection, a static in-memory list, or an infrastructure adapter
//! reading tool manifests from disk. Providers are queried in caller order
//! on every view build; when two providers expose the same name, the first
//! occurrence wins.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::entities::ToolDef;
use crate::command::registry::CommandRegistry;

/// Error type for tool provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider exists but cannot currently serve tools.
    #[error("provider not available: {0}")]
    NotAvailable(String),

    /// The provider's backing source failed to load or parse.
    #[error("tool discovery failed: {0}")]
    DiscoveryFailed(String),
}

/// Source of tool definitions.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Unique identifier, e.g. "registry", "manifest:./tools.toml".
    fn id(&self) -> &str;

    /// Produce this provider's tool list.
    ///
    /// Called on every view build — implementations that poll external
    /// sources decide internally whether to reload.
    async fn tools(&self) -> Result<Vec<ToolDef>, ProviderError>;
}

/// Fixed in-memory provider; the simplest source and the test workhorse.
pub struct StaticToolProvider {
    id: String,
    tools: Vec<ToolDef>,
}

impl StaticToolProvider {
    pub fn new(id: impl Into<String>, tools: Vec<ToolDef>) -> Self {
        Self {
            id: id.into(),
            tools,
        }
    }
}

#[async_trait]
impl ToolProvider for StaticToolProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn tools(&self) -> Result<Vec<ToolDef>, ProviderError> {
        Ok(self.tools.clone())
    }
}

/// Projects the command registry into tool definitions.
///
/// Per lineage, the projection emits:
/// - one entry under the bare base name for the latest (or sole
///   unversioned) command, and
/// - one `{base_name}-v{version}` entry per versioned command, latest
///   included, so pinned tokens stay addressable in every surface.
///
/// Registry metadata (base name, version, deprecation fields) is stamped on
/// each ToolDef so downstream transforms never re-parse exposed names.
pub struct RegistryProvider {
    registry: Arc<CommandRegistry>,
}

impl RegistryProvider {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ToolProvider for RegistryProvider {
    fn id(&self) -> &str {
        "registry"
    }

    async fn tools(&self) -> Result<Vec<ToolDef>, ProviderError> {
        let mut defs = Vec::new();

        for command in self.registry.commands() {
            let projected = ToolDef {
                name: command.base_name.clone(),
                description: command.description.clone(),
                parameters: command.parameters.clone(),
                hidden: command.hidden,
                tags: command.tags.clone(),
                risk_level: command.risk_level,
                metadata: Default::default(),
                base_name: Some(command.base_name.clone()),
                version: command.version,
                deprecated: command.deprecated,
                deprecated_message: command.deprecated_message.clone(),
                deprecated_version: command.deprecated_version,
                handler: Arc::clone(&command.handler),
            };

            if self.registry.is_latest(command) {
                defs.push(projected.clone());
            }
            if command.version.is_some() {
                defs.push(projected.renamed(command.pinned_token()));
            }
        }

        Ok(defs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::entities::Command;
    use crate::core::version::Version;
    use crate::tool::entities::test_support::{tool, NullHandler};

    fn registry_with_search_lineage() -> Arc<CommandRegistry> {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                Command::new("search", "Search v1", Arc::new(NullHandler))
                    .with_version(Version::new(1, 0, 0)),
            )
            .unwrap();
        registry
            .register(
                Command::new("search", "Search v2", Arc::new(NullHandler))
                    .with_version(Version::new(2, 0, 0)),
            )
            .unwrap();
        registry
            .register(Command::new("greet", "Greet", Arc::new(NullHandler)))
            .unwrap();
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_static_provider_returns_fixed_list() {
        let provider = StaticToolProvider::new("static", vec![tool("a"), tool("b")]);
        let tools = provider.tools().await.unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(provider.id(), "static");
    }

    #[tokio::test]
    async fn test_registry_projection_aliases() {
        let provider = RegistryProvider::new(registry_with_search_lineage());
        let tools = provider.tools().await.unwrap();

        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        // Bare latest + both pinned entries + sole unversioned.
        assert!(names.contains(&"search"));
        assert!(names.contains(&"search-v1.0.0"));
        assert!(names.contains(&"search-v2.0.0"));
        assert!(names.contains(&"greet"));
        assert_eq!(tools.len(), 4);

        // The bare entry is the latest version.
        let bare = tools.iter().find(|t| t.name == "search").unwrap();
        assert_eq!(bare.version, Some(Version::new(2, 0, 0)));

        // Unversioned commands get no pinned alias.
        assert!(!names.iter().any(|n| n.starts_with("greet-v")));
    }

    #[tokio::test]
    async fn test_projection_carries_registry_metadata() {
        let provider = RegistryProvider::new(registry_with_search_lineage());
        let tools = provider.tools().await.unwrap();

        let pinned = tools.iter().find(|t| t.name == "search-v1.0.0").unwrap();
        assert_eq!(pinned.base_name.as_deref(), Some("search"));
        assert_eq!(pinned.version, Some(Version::new(1, 0, 0)));
    }
}
