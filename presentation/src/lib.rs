//! Presentation layer for prism
//!
//! This crate contains CLI definitions, the dynamic argument-parsing
//! adapter, the interactive confirmation prompt, envelope formatters, and
//! the export surfaces.

pub mod cli;
pub mod confirm;
pub mod export;
pub mod output;

// Re-export commonly used types
pub use cli::{
    args::{parse_invocation, InlineFlags, ParsedInvocation},
    commands::{Cli, Commands, ConfigCommand, OutputFormat, ToolsCommand},
};
pub use confirm::TtyConfirmation;
pub use export::{export_manifest, export_schema, render_tool_list, tool_to_schema};
pub use output::ConsoleFormatter;
