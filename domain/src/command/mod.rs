//! Command domain module.
//!
//! A [`Command`](entities::Command) is one registered operation: a base
//! name, an optional version, an explicit parameter descriptor list, and a
//! handler. The [`CommandRegistry`](registry::CommandRegistry) owns the
//! canonical command set and implements the dispatch-token resolution
//! algorithm:
//!
//! ```text
//! search            -> greatest registered version of "search"
//! search-v1.0.0     -> the pinned 1.0.0 command
//! greet             -> the sole unversioned "greet" command
//! ```
//!
//! Deprecation is evaluated at resolution/invocation time as a pure
//! comparison against the host application version; the registry is never
//! mutated by lifecycle changes.

pub mod entities;
pub mod registry;

pub use entities::{ArgumentMap, Command, CommandHandler, HandlerError};
pub use registry::{CommandRegistry, LifecycleState, RegistryError};
