//! Domain layer for prism
//!
//! This crate contains the core business logic, entities, and value
//! objects. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Registry and Views
//!
//! The [`command::CommandRegistry`] owns the canonical, versioned command
//! set. Consumers never read it directly: every surface (CLI dispatch,
//! schema export, manifest export) works from a **view** — the ordered,
//! deduplicated [`tool::ToolDef`] sequence produced by running all
//! providers and folding the transform chain.
//!
//! ## Invocation Envelope
//!
//! One invocation produces exactly one [`invocation::Envelope`], success or
//! failure, with a stable error taxonomy and exit-code mapping that is
//! identical across every surface.

pub mod command;
pub mod core;
pub mod invocation;
pub mod tool;

// Re-export commonly used types
pub use command::{
    entities::{ArgumentMap, Command, CommandHandler, HandlerError},
    registry::{CommandRegistry, LifecycleState, RegistryError},
};
pub use core::{
    sanitize::{sanitize, sanitize_value, REDACTION_MARKER},
    version::{Version, VersionParseError},
};
pub use invocation::{
    context::{ResponseFormat, ToolContext},
    envelope::{Envelope, EnvelopeMeta, ErrorObject, Suggestion},
    error::{InvocationError, EXIT_INTERNAL, EXIT_SUCCESS, EXIT_USER},
};
pub use tool::{
    entities::{ParamType, RiskLevel, ToolDef, ToolParameter},
    provider::{ProviderError, RegistryProvider, StaticToolProvider, ToolProvider},
    transform::{NamespaceTransform, ToolTransform, VersionFilter, VisibilityTransform},
    view::ViewBuilder,
};
