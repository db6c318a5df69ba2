//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Envelope rendering for command output
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Structured JSON envelope
    Json,
}

/// CLI arguments for prism
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(author, version, about = "Versioned command registry with multi-surface exports")]
#[command(long_about = r#"
Prism exposes one set of versioned commands through several surfaces:
direct CLI dispatch, JSON envelopes, JSON Schema export, and a
tool-manifest export for agent integration.

Dispatch tokens:
  prism search               latest version of the 'search' lineage
  prism search-v1.0.0        pinned historical version

Invocation flags (--force, --yes, --dry-run) may be given before or after
the command token. Other global flags must come before it.

Configuration files are loaded from (in priority order):
1. PRISM_* environment variables (PRISM_SECTION__KEY)
2. --config <path>      Explicit config file
3. ./prism.toml         Project-level config
4. ~/.config/prism/config.toml   Global config

Example:
  prism greet --name Ada
  prism tools schema > tools-schema.json
  prism --output json search --query "error handling"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Proceed without confirmation for destructive commands
    #[arg(long, global = true)]
    pub force: bool,

    /// Assume yes for confirmation prompts (ignored under strict policy)
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Report what would be done without doing it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Envelope rendering
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Voluntary timeout hint for the command handler, in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Idempotency key recorded in the invocation context
    #[arg(long, global = true, value_name = "KEY")]
    pub idempotency_key: Option<String>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect and export the tool view
    Tools {
        #[command(subcommand)]
        surface: ToolsCommand,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// A registered command token plus its arguments
    #[command(external_subcommand)]
    Invoke(Vec<String>),
}

#[derive(Subcommand, Debug)]
pub enum ToolsCommand {
    /// Human-readable tool listing
    List {
        /// Include hidden tools
        #[arg(long)]
        all: bool,
    },
    /// JSON Schema export, one entry per tool
    Schema,
    /// Tool-manifest export for agent integration
    Manifest,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show configuration sources and resolved settings
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_subcommand_captured() {
        let cli = Cli::parse_from(["prism", "greet", "--name", "Ada"]);
        match cli.command {
            Some(Commands::Invoke(tokens)) => {
                assert_eq!(tokens, vec!["greet", "--name", "Ada"]);
            }
            other => panic!("expected external subcommand, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_before_token() {
        let cli = Cli::parse_from(["prism", "--force", "-vv", "purge-telemetry"]);
        assert!(cli.force);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Invoke(_))));
    }

    #[test]
    fn test_tools_subcommands() {
        let cli = Cli::parse_from(["prism", "tools", "schema"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Tools {
                surface: ToolsCommand::Schema
            })
        ));

        let cli = Cli::parse_from(["prism", "tools", "list", "--all"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Tools {
                surface: ToolsCommand::List { all: true }
            })
        ));
    }

    #[test]
    fn test_output_format_flag() {
        let cli = Cli::parse_from(["prism", "--output", "json", "tools", "manifest"]);
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
