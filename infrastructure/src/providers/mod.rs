//! Tool providers backed by external sources.

pub mod manifest;

pub use manifest::{ManifestToolProvider, ReloadOutcome};
