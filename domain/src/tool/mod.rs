//! Tool domain module.
//!
//! Where [`crate::command`] owns the canonical registry, this module owns
//! what consumers actually see: the portable [`ToolDef`](entities::ToolDef)
//! projection, the providers that produce ToolDef lists, and the transform
//! chain that derives per-consumer **views**.
//!
//! ```text
//! ┌───────────┐   ┌───────────┐        ┌────────────────┐
//! │ Provider  │ + │ Provider  │  ──▶   │ raw ToolDefs   │
//! └───────────┘   └───────────┘        └───────┬────────┘
//!                                              │ transforms, left to right
//!                                      ┌───────▼────────┐
//!                                      │     View       │
//!                                      └───────┬────────┘
//!                 CLI dispatch ◀───────────────┼───────────▶ schema export
//!                                              ▼
//!                                       manifest export
//! ```
//!
//! Views are rebuilt on every request — no caching — so hot-reloading
//! providers and runtime transform changes are always reflected. Export
//! surfaces consume the finished view and never re-derive visibility or
//! naming decisions themselves.

pub mod entities;
pub mod provider;
pub mod transform;
pub mod view;

pub use entities::{ParamType, RiskLevel, ToolDef, ToolParameter};
pub use provider::{ProviderError, RegistryProvider, StaticToolProvider, ToolProvider};
pub use transform::{NamespaceTransform, ToolTransform, VersionFilter, VisibilityTransform};
pub use view::ViewBuilder;
