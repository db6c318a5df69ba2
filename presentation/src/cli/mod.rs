//! CLI definitions and the dynamic argument-parsing adapter.

pub mod args;
pub mod commands;

pub use args::{parse_invocation, InlineFlags, ParsedInvocation};
pub use commands::{Cli, Commands, ConfigCommand, OutputFormat, ToolsCommand};
