//! Export surfaces.
//!
//! All three surfaces — schema export, tool-manifest export, and the
//! interactive listing — consume one already-transformed view and render
//! identical per-tool fields. None of them re-derives visibility or
//! namespace decisions; that happened in the transform chain.

pub mod help;
pub mod manifest;
pub mod schema;

pub use help::render_tool_list;
pub use manifest::export_manifest;
pub use schema::{export_schema, tool_to_schema};
