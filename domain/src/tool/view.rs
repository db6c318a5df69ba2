//! View building: providers in, transformed tool list out.

use std::sync::Arc;

use super::entities::ToolDef;
use super::provider::ToolProvider;
use super::transform::ToolTransform;

/// Builds the materialized view consumed by export surfaces and dispatch.
///
/// Provider order is the caller's and is preserved; duplicate names from
/// later providers do not override earlier ones (first occurrence wins).
/// Transforms fold left-to-right over the deduplicated sequence.
///
/// `build` runs the full chain on every call — nothing is cached — so a
/// provider that hot-reloads its backing file is always reflected in the
/// next view.
#[derive(Default)]
pub struct ViewBuilder {
    providers: Vec<Arc<dyn ToolProvider>>,
    transforms: Vec<Box<dyn ToolTransform>>,
}

impl ViewBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: Arc<dyn ToolProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn transform(mut self, transform: Box<dyn ToolTransform>) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Materialize the view.
    ///
    /// A provider that fails discovery is skipped with a warning; the
    /// remaining providers still produce a view.
    pub async fn build(&self) -> Vec<ToolDef> {
        let mut tools: Vec<ToolDef> = Vec::new();

        for provider in &self.providers {
            match provider.tools().await {
                Ok(batch) => {
                    for tool in batch {
                        if tools.iter().any(|t| t.name == tool.name) {
                            tracing::debug!(
                                tool = %tool.name,
                                provider = provider.id(),
                                "duplicate tool name, first occurrence wins"
                            );
                            continue;
                        }
                        tools.push(tool);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.id(),
                        error = %e,
                        "provider failed discovery, skipping"
                    );
                }
            }
        }

        self.transforms
            .iter()
            .fold(tools, |acc, transform| transform.apply(acc))
    }

    /// Build and resolve one exposed name in a single pass.
    pub async fn resolve(&self, name: &str) -> Option<ToolDef> {
        self.build().await.into_iter().find(|t| t.name == name)
    }
}
