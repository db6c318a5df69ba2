//! CLI entrypoint for prism
//!
//! This is the main binary that wires together all layers using
//! dependency injection: configuration is resolved once, the registry and
//! providers are built, and every request gets a freshly materialized
//! view.

mod builtins;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use prism_application::{
    is_truthy, ConfirmationPort, InvokeCommandUseCase, NoopTelemetry, PipelineConfig,
    SecurityPolicy, TelemetryPort, TelemetrySettings,
};
use prism_domain::{
    CommandRegistry, Envelope, InvocationError, NamespaceTransform, RegistryProvider,
    ResponseFormat, ToolContext, ToolDef, ToolProvider, Version, ViewBuilder,
    VisibilityTransform, EXIT_USER,
};
use prism_infrastructure::{ConfigLoader, FileConfig, JsonlTelemetryRecorder, ManifestToolProvider};
use prism_presentation::{
    parse_invocation, render_tool_list, Cli, Commands, ConfigCommand, ConsoleFormatter,
    OutputFormat, ToolsCommand, TtyConfirmation,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("configuration error: {}", e))?
    };

    let app = AppContext::resolve(&file_config)?;
    info!(app = %app.pipeline.app_name, version = %app.pipeline.app_version, "starting prism");

    match &cli.command {
        Some(Commands::Tools { surface }) => match surface {
            ToolsCommand::List { all } => {
                let view = app.build_view(*all).await;
                print!("{}", render_tool_list(&view));
            }
            ToolsCommand::Schema => {
                let view = app.build_view(false).await;
                let schema = prism_presentation::export_schema(&view);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            ToolsCommand::Manifest => {
                let view = app.build_view(false).await;
                let manifest = prism_presentation::export_manifest(
                    &app.pipeline.app_name,
                    app.pipeline.app_version,
                    &view,
                );
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            }
        },
        Some(Commands::Config { action }) => match action {
            ConfigCommand::Show => {
                for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
                    println!("{}", line);
                }
                println!();
                println!("Resolved settings:");
                println!("  security.policy  = {}", app.pipeline.security_policy.as_str());
                println!("  security.bypass  = {}", app.pipeline.assume_yes);
                println!("  telemetry.enabled = {}", app.pipeline.telemetry.enabled);
                println!("  telemetry.path   = {}", app.telemetry_path.display());
            }
        },
        Some(Commands::Invoke(tokens)) => {
            let exit_code = app.dispatch(&cli, tokens).await;
            std::process::exit(exit_code);
        }
        None => {
            Cli::command().print_long_help()?;
        }
    }

    Ok(())
}

/// Everything resolved once at startup.
struct AppContext {
    pipeline: Arc<PipelineConfig>,
    telemetry_path: PathBuf,
    telemetry: Arc<dyn TelemetryPort>,
    providers: Vec<Arc<dyn ToolProvider>>,
    namespace: Option<String>,
    include_hidden_default: bool,
    scopes: Vec<String>,
}

impl AppContext {
    fn resolve(file: &FileConfig) -> Result<Self> {
        let app_version = resolve_app_version(file);

        let telemetry_settings = TelemetrySettings {
            enabled: file.telemetry.enabled,
            path: file.telemetry.path.clone().map(PathBuf::from),
            retention_days: file.telemetry.retention_days,
        };
        let telemetry_path = telemetry_settings
            .path
            .clone()
            .unwrap_or_else(|| JsonlTelemetryRecorder::default_path(&file.app.name));
        let telemetry: Arc<dyn TelemetryPort> = if telemetry_settings.enabled {
            Arc::new(JsonlTelemetryRecorder::new(
                &telemetry_path,
                telemetry_settings.retention_days,
            ))
        } else {
            Arc::new(NoopTelemetry)
        };

        // The bypass signal is resolved here, once: config setting or the
        // PRISM_ASSUME_YES environment variable with a truthy value.
        let assume_yes = file.security.assume_yes
            || std::env::var("PRISM_ASSUME_YES").is_ok_and(|v| is_truthy(&v));

        let pipeline = PipelineConfig::new(&file.app.name, app_version)
            .with_security_policy(SecurityPolicy::parse(&file.security.policy))
            .with_assume_yes(assume_yes)
            .with_telemetry(telemetry_settings);

        let mut registry = CommandRegistry::new();
        builtins::register_all(&mut registry, telemetry_path.clone())
            .context("builtin command registration failed")?;
        let registry = Arc::new(registry);

        let mut providers: Vec<Arc<dyn ToolProvider>> =
            vec![Arc::new(RegistryProvider::new(registry))];
        for manifest in &file.tools.manifests {
            providers.push(Arc::new(ManifestToolProvider::new(manifest)));
        }

        Ok(Self {
            pipeline: Arc::new(pipeline),
            telemetry_path,
            telemetry,
            providers,
            namespace: file
                .tools
                .namespace
                .clone()
                .filter(|ns| !ns.is_empty()),
            include_hidden_default: file.tools.include_hidden,
            scopes: file.auth.scopes.clone(),
        })
    }

    /// Materialize a fresh view. Nothing is cached across calls, so
    /// manifest hot-reloads are always reflected.
    async fn build_view(&self, include_hidden: bool) -> Vec<ToolDef> {
        let mut builder = ViewBuilder::new();
        for provider in &self.providers {
            builder = builder.provider(Arc::clone(provider));
        }
        builder = builder.transform(Box::new(
            VisibilityTransform::new()
                .include_hidden(include_hidden || self.include_hidden_default),
        ));
        if let Some(namespace) = &self.namespace {
            builder = builder.transform(Box::new(NamespaceTransform::new(namespace)));
        }
        builder.build().await
    }

    /// Resolve a dispatch token and run the pipeline; returns the process
    /// exit code.
    async fn dispatch(&self, cli: &Cli, tokens: &[String]) -> i32 {
        let token = &tokens[0];

        // Dispatch resolves against the unfiltered view: hidden commands
        // are callable, just not listed.
        let view = self.build_view(true).await;
        let Some(tool) = view.iter().find(|t| &t.name == token) else {
            let error = InvocationError::CommandNotFound {
                token: token.clone(),
            };
            self.print_envelope(cli, &Envelope::failure(&error));
            return EXIT_USER;
        };

        let parsed = match parse_invocation(tool, &tokens[1..]) {
            Ok(parsed) => parsed,
            Err(error) => {
                self.print_envelope(cli, &Envelope::failure(&error));
                return error.exit_code();
            }
        };

        let mut ctx = ToolContext::new()
            .with_force(cli.force || parsed.flags.force)
            .with_yes(cli.yes || parsed.flags.yes)
            .with_dry_run(cli.dry_run || parsed.flags.dry_run)
            .with_quiet(cli.quiet)
            .with_verbose(cli.verbose > 0)
            .with_response_format(match cli.output {
                OutputFormat::Text => ResponseFormat::Text,
                OutputFormat::Json => ResponseFormat::Json,
            })
            .with_scopes(self.scopes.iter().cloned());
        if let Some(timeout) = cli.timeout {
            ctx = ctx.with_timeout_ms(timeout);
        }
        if let Some(key) = &cli.idempotency_key {
            ctx = ctx.with_idempotency_key(key);
        }

        let confirmation: Arc<dyn ConfirmationPort> = Arc::new(TtyConfirmation::new());
        let use_case = InvokeCommandUseCase::new(
            Arc::clone(&self.pipeline),
            Arc::clone(&self.telemetry),
            confirmation,
        );

        let outcome = use_case.execute(tool, parsed.args, &ctx).await;
        self.print_envelope(cli, &outcome.envelope);
        outcome.exit_code
    }

    /// JSON envelopes always go to stdout; text errors go to stderr.
    fn print_envelope(&self, cli: &Cli, envelope: &Envelope) {
        match cli.output {
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(envelope)),
            OutputFormat::Text => {
                let rendered = ConsoleFormatter::format_text(envelope);
                if envelope.ok {
                    print!("{}", rendered);
                } else {
                    eprint!("{}", rendered);
                }
            }
        }
    }
}

/// App version: config override first, then the crate version.
fn resolve_app_version(file: &FileConfig) -> Version {
    if let Some(raw) = &file.app.version {
        match raw.parse() {
            Ok(version) => return version,
            Err(e) => warn!("ignoring invalid [app].version: {}", e),
        }
    }
    env!("CARGO_PKG_VERSION")
        .parse()
        .unwrap_or(Version::new(0, 0, 0))
}
