//! The invocation pipeline.
//!
//! Turns a resolved tool plus parsed arguments into an envelope and a
//! telemetry record:
//!
//! ```text
//! lifecycle check ──▶ security gate ──▶ parameter validation
//!        │                 │                   │
//!        ▼                 ▼                   ▼
//!   E1001 Removed    E1006/E1007/E1008    E1003 InvalidArguments
//!
//! ──▶ timed execution ──▶ sanitize ──▶ envelope ──▶ telemetry
//! ```
//!
//! Every failure path still reaches the telemetry step; internal handler
//! failures are caught here, converted to envelope form, and never crash
//! the host.

use std::sync::Arc;
use std::time::Instant;

use prism_domain::command::registry::LifecycleState;
use prism_domain::{
    sanitize_value, ArgumentMap, Envelope, HandlerError, InvocationError, ToolContext, ToolDef,
    EXIT_SUCCESS,
};

use crate::config::{PipelineConfig, SecurityPolicy};
use crate::ports::confirmation::{ConfirmationError, ConfirmationPort};
use crate::ports::telemetry::{TelemetryPort, TelemetryRecord};

/// Result of one trip through the pipeline.
#[derive(Debug, Clone)]
pub struct InvocationOutcome {
    pub envelope: Envelope,
    pub exit_code: i32,
}

/// The invocation pipeline use case.
///
/// Owns nothing mutable: configuration is resolved once at startup and the
/// ports are injected at wiring time, so a single instance serves every
/// invocation of the process.
pub struct InvokeCommandUseCase {
    config: Arc<PipelineConfig>,
    telemetry: Arc<dyn TelemetryPort>,
    confirmation: Arc<dyn ConfirmationPort>,
}

impl InvokeCommandUseCase {
    pub fn new(
        config: Arc<PipelineConfig>,
        telemetry: Arc<dyn TelemetryPort>,
        confirmation: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            config,
            telemetry,
            confirmation,
        }
    }

    /// Run the full pipeline for one resolved tool.
    pub async fn execute(
        &self,
        tool: &ToolDef,
        args: ArgumentMap,
        ctx: &ToolContext,
    ) -> InvocationOutcome {
        let started = Instant::now();

        let result = self.run_stages(tool, args, ctx).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let outcome = match result {
            Ok((value, warnings)) => InvocationOutcome {
                envelope: Envelope::success(
                    &self.config.app_name,
                    &tool.name,
                    self.config.app_version,
                    value,
                    warnings,
                ),
                exit_code: EXIT_SUCCESS,
            },
            Err(error) => {
                tracing::debug!(
                    command = %tool.name,
                    code = error.code(),
                    "invocation failed"
                );
                InvocationOutcome {
                    envelope: Envelope::failure(&error),
                    exit_code: error.exit_code(),
                }
            }
        };

        self.emit_telemetry(tool, &outcome, duration_ms);
        outcome
    }

    /// Stages 1-5: everything that can fail, producing the sanitized value
    /// and any deprecation warnings.
    async fn run_stages(
        &self,
        tool: &ToolDef,
        args: ArgumentMap,
        ctx: &ToolContext,
    ) -> Result<(serde_json::Value, Vec<String>), InvocationError> {
        let warnings = self.check_lifecycle(tool)?;
        self.check_security_gate(tool, ctx).await?;
        let args = validate_arguments(tool, args)?;

        let value = match tool.handler.run(&args, ctx).await {
            Ok(value) => value,
            Err(HandlerError::InvalidArgument(message)) => {
                return Err(InvocationError::InvalidArguments {
                    command: tool.name.clone(),
                    message,
                });
            }
            Err(HandlerError::Failed(message)) => {
                tracing::error!(command = %tool.name, error = %message, "handler failed");
                return Err(InvocationError::Internal {
                    command: tool.name.clone(),
                    message,
                });
            }
        };

        Ok((sanitize_value(&value), warnings))
    }

    /// Stage 1: deprecation/removal, a pure comparison against the host
    /// version on every invocation.
    fn check_lifecycle(&self, tool: &ToolDef) -> Result<Vec<String>, InvocationError> {
        match tool.lifecycle(self.config.app_version) {
            LifecycleState::Active => Ok(Vec::new()),
            LifecycleState::DeprecatedWarn => {
                let removal = tool
                    .deprecated_version
                    .map(|v| format!("Scheduled for removal in v{}.", v));
                let message = tool
                    .deprecated_message
                    .clone()
                    .unwrap_or_else(|| format!("Command '{}' is deprecated.", tool.name));
                Ok(std::iter::once(message).chain(removal).collect())
            }
            LifecycleState::Removed => Err(InvocationError::Removed {
                command: tool.name.clone(),
                // lifecycle() only reports Removed with a version present
                removed_in: tool.deprecated_version.unwrap_or(self.config.app_version),
                migration: tool.deprecated_message.clone(),
            }),
        }
    }

    /// Stage 2: the security gate for destructive commands.
    async fn check_security_gate(
        &self,
        tool: &ToolDef,
        ctx: &ToolContext,
    ) -> Result<(), InvocationError> {
        if !tool.risk_level.requires_confirmation() {
            return Ok(());
        }

        let satisfied = match self.config.security_policy {
            SecurityPolicy::Off => true,
            SecurityPolicy::Standard => ctx.force || ctx.yes || self.config.assume_yes,
            // Strict ignores --yes and the bypass signal entirely.
            SecurityPolicy::Strict => ctx.force,
        };
        if satisfied {
            return Ok(());
        }

        let prompt = format!(
            "Command '{}' performs a destructive action. Proceed?",
            tool.name
        );
        match self.confirmation.confirm(&prompt, false).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(InvocationError::ConfirmationDenied {
                command: tool.name.clone(),
            }),
            Err(ConfirmationError::Unavailable(_)) => Err(InvocationError::PromptUnavailable {
                command: tool.name.clone(),
            }),
            Err(ConfirmationError::InvalidAnswer { answer }) => {
                Err(InvocationError::InvalidConfirmation { answer })
            }
        }
    }

    /// Stage 7: the telemetry side-channel, fed on success and failure
    /// alike. Never raw arguments, never raw results.
    fn emit_telemetry(&self, tool: &ToolDef, outcome: &InvocationOutcome, duration_ms: u64) {
        let error = outcome.envelope.error.as_ref();
        let record = TelemetryRecord::now(
            self.config.app_name.clone(),
            format!("{}.{}", self.config.app_name, tool.name),
            outcome.envelope.ok,
            duration_ms,
            outcome.exit_code,
            error.map(|e| e.code.clone()),
            error.map(|e| e.category.clone()),
        );
        self.telemetry.record(&record);
    }
}

/// Stage 3: validate arguments against the declared parameter list and fill
/// in declared defaults.
fn validate_arguments(tool: &ToolDef, mut args: ArgumentMap) -> Result<ArgumentMap, InvocationError> {
    for param in &tool.parameters {
        if args.contains_key(&param.name) {
            continue;
        }
        if let Some(default) = &param.default {
            args.insert(param.name.clone(), default.clone());
        } else if param.required {
            return Err(InvocationError::InvalidArguments {
                command: tool.name.clone(),
                message: format!("missing required parameter '{}'", param.name),
            });
        }
    }

    for name in args.keys() {
        if !tool.parameters.iter().any(|p| &p.name == name) {
            return Err(InvocationError::InvalidArguments {
                command: tool.name.clone(),
                message: format!("unknown parameter '{}'", name),
            });
        }
    }

    Ok(args)
}
