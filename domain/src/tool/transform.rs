//! View transforms.
//!
//! A [`ToolTransform`] is a pure, order-sensitive mapping over a tool list.
//! Transforms never mutate their input and preserve the relative order of
//! surviving entries; a view folds its transform chain left-to-right over
//! the concatenated provider output.

use std::collections::BTreeSet;

use super::entities::ToolDef;
use crate::core::version::Version;

/// Pure `Vec<ToolDef> -> Vec<ToolDef>` mapping.
pub trait ToolTransform: Send + Sync {
    /// Short identifier for diagnostics.
    fn name(&self) -> &str;

    fn apply(&self, tools: Vec<ToolDef>) -> Vec<ToolDef>;
}

/// Prefixes every exposed name with `{prefix}{separator}`.
///
/// Composition is explicit: applying the transform twice double-prefixes.
pub struct NamespaceTransform {
    prefix: String,
    separator: String,
}

impl NamespaceTransform {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: "_".to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl ToolTransform for NamespaceTransform {
    fn name(&self) -> &str {
        "namespace"
    }

    fn apply(&self, tools: Vec<ToolDef>) -> Vec<ToolDef> {
        tools
            .iter()
            .map(|t| t.renamed(format!("{}{}{}", self.prefix, self.separator, t.name)))
            .collect()
    }
}

/// Filters by hidden flag and tag sets.
///
/// Tag checks use non-empty-intersection semantics, not subset: a tool
/// survives `include_tags` if it carries *any* of them, and is dropped by
/// `exclude_tags` if it carries *any* of those.
#[derive(Default)]
pub struct VisibilityTransform {
    include_tags: BTreeSet<String>,
    exclude_tags: BTreeSet<String>,
    include_hidden: bool,
}

impl VisibilityTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.include_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    fn intersects(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
        a.intersection(b).next().is_some()
    }
}

impl ToolTransform for VisibilityTransform {
    fn name(&self) -> &str {
        "visibility"
    }

    fn apply(&self, tools: Vec<ToolDef>) -> Vec<ToolDef> {
        tools
            .into_iter()
            .filter(|t| {
                if t.hidden && !self.include_hidden {
                    return false;
                }
                if Self::intersects(&t.tags, &self.exclude_tags) {
                    return false;
                }
                if !self.include_tags.is_empty() && !Self::intersects(&t.tags, &self.include_tags)
                {
                    return false;
                }
                true
            })
            .collect()
    }
}

/// Keeps only tools whose registry version lies within an inclusive range.
///
/// The filter reads the version metadata stamped by the registry
/// projection — it never parses exposed names, so it composes with
/// [`NamespaceTransform`] in either order. The bare latest alias carries
/// the true latest version and therefore survives exactly when that
/// version itself is in range. Unversioned tools pass through untouched.
#[derive(Default)]
pub struct VersionFilter {
    min_version: Option<Version>,
    max_version: Option<Version>,
}

impl VersionFilter {
    pub fn new(min_version: Option<Version>, max_version: Option<Version>) -> Self {
        Self {
            min_version,
            max_version,
        }
    }

    fn in_range(&self, version: Version) -> bool {
        if self.min_version.is_some_and(|min| version < min) {
            return false;
        }
        if self.max_version.is_some_and(|max| version > max) {
            return false;
        }
        true
    }
}

impl ToolTransform for VersionFilter {
    fn name(&self) -> &str {
        "version-filter"
    }

    fn apply(&self, tools: Vec<ToolDef>) -> Vec<ToolDef> {
        tools
            .into_iter()
            .filter(|t| match t.version {
                Some(v) => self.in_range(v),
                None => true,
            })
            .collect()
    }
}
