//! Command registry: version grouping, latest-selection, alias resolution.
//!
//! The registry owns the canonical command set. Resolution maps a dispatch
//! token to exactly one command:
//!
//! 1. Commands are grouped by `base_name`.
//! 2. The bare `base_name` token resolves to the numerically-greatest
//!    version in the group (or the sole unversioned command).
//! 3. Every versioned command is also reachable under its pinned token
//!    `{base_name}-v{version}`.
//!
//! Consumers always get a stable "latest" entry point while historical
//! versions stay individually addressable, without inflating the default
//! command list.

use std::collections::BTreeMap;
use thiserror::Error;

use super::entities::Command;
use crate::core::version::Version;

/// Registration-time failure. A conflict is a startup bug, not a runtime
/// envelope error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command '{token}' is already registered")]
    Conflict { token: String },

    #[error(
        "command '{base_name}' mixes versioned and unversioned registrations"
    )]
    MixedLineage { base_name: String },
}

/// Lifecycle of a command relative to the host application version.
///
/// `Active` and `Removed` are terminal; `DeprecatedWarn` turns into
/// `Removed` on its own once the host version crosses the removal
/// threshold. Evaluation is a pure comparison — the registry never mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    DeprecatedWarn,
    Removed,
}

/// Shared lifecycle evaluation for commands and their tool projections.
pub(crate) fn evaluate_lifecycle(
    deprecated: bool,
    removal: Option<Version>,
    host_version: Version,
) -> LifecycleState {
    if !deprecated {
        return LifecycleState::Active;
    }
    match removal {
        None => LifecycleState::Active,
        Some(removal) if host_version < removal => LifecycleState::DeprecatedWarn,
        Some(_) => LifecycleState::Removed,
    }
}

impl Command {
    /// Evaluate this command's lifecycle against the host version.
    pub fn lifecycle(&self, host_version: Version) -> LifecycleState {
        evaluate_lifecycle(self.deprecated, self.deprecated_version, host_version)
    }
}

/// The canonical, conflict-checked command set.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    /// base_name → commands of that lineage. BTreeMap keeps iteration
    /// order stable for projections and exports.
    groups: BTreeMap<String, Vec<Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    /// Register a command.
    ///
    /// Fails on a duplicate `(base_name, version)` pair, and on mixing an
    /// unversioned command with a versioned lineage under one base name.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        let group = self.groups.entry(command.base_name.clone()).or_default();

        if group.iter().any(|c| c.version == command.version) {
            return Err(RegistryError::Conflict {
                token: command.pinned_token(),
            });
        }
        if !group.is_empty()
            && group.iter().any(|c| c.version.is_none()) != command.version.is_none()
        {
            return Err(RegistryError::MixedLineage {
                base_name: command.base_name.clone(),
            });
        }
        group.push(command);
        Ok(())
    }

    /// Resolve a dispatch token to a command.
    pub fn resolve(&self, token: &str) -> Option<&Command> {
        // Bare base name: latest version wins.
        if let Some(group) = self.groups.get(token) {
            return Self::latest_of(group);
        }

        // Pinned token: {base_name}-v{version}. The base name may itself
        // contain '-', so every candidate split is tried.
        for (idx, _) in token.match_indices("-v") {
            let (base, suffix) = token.split_at(idx);
            let Ok(version) = suffix[2..].parse::<Version>() else {
                continue;
            };
            if let Some(group) = self.groups.get(base) {
                if let Some(cmd) = group.iter().find(|c| c.version == Some(version)) {
                    return Some(cmd);
                }
            }
        }

        None
    }

    /// The command reachable under the bare base-name token.
    fn latest_of(group: &[Command]) -> Option<&Command> {
        group.iter().max_by_key(|c| c.version)
    }

    /// Whether `command` is the one the bare token resolves to.
    pub fn is_latest(&self, command: &Command) -> bool {
        self.groups
            .get(&command.base_name)
            .and_then(|group| Self::latest_of(group))
            .is_some_and(|latest| latest.version == command.version)
    }

    /// Iterate all registered commands, grouped by base name, versions in
    /// registration order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.groups.values().flatten()
    }

    /// Number of registered commands across all lineages.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
