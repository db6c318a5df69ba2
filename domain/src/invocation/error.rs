//! Invocation error taxonomy.
//!
//! Every failure the pipeline can produce carries a stable code, a
//! category, and an exit code, identical across all output surfaces:
//!
//! | Kind                | Code    | Category     | Exit |
//! |---------------------|---------|--------------|------|
//! | Removed             | `E1001` | `validation` | 2    |
//! | CommandNotFound     | `E1002` | `validation` | 2    |
//! | InvalidArguments    | `E1003` | `validation` | 2    |
//! | ConfirmationDenied  | `E1006` | `security`   | 2    |
//! | PromptUnavailable   | `E1007` | `security`   | 2    |
//! | InvalidConfirmation | `E1008` | `validation` | 2    |
//! | Internal            | `E5000` | `internal`   | 70   |
//!
//! User-input and policy failures surface immediately and are never
//! retried. Internal errors are caught at the pipeline boundary and
//! converted to this form; they must not crash the host process.

use thiserror::Error;

use crate::core::version::Version;

/// Process exit code for a successful invocation.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for user/validation/security-gate/removed-command failures.
pub const EXIT_USER: i32 = 2;
/// Exit code for uncaught handler failures (conventional EX_SOFTWARE).
pub const EXIT_INTERNAL: i32 = 70;

/// One classified invocation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// The resolved command is past its removal version.
    #[error("command '{command}' was removed in v{removed_in}")]
    Removed {
        command: String,
        removed_in: Version,
        migration: Option<String>,
    },

    /// The dispatch token resolved to nothing.
    #[error("unknown command '{token}'")]
    CommandNotFound { token: String },

    /// Missing required parameter or unknown argument name.
    #[error("{message}")]
    InvalidArguments { command: String, message: String },

    /// The security gate required confirmation and did not get it.
    #[error("destructive command '{command}' was not confirmed")]
    ConfirmationDenied { command: String },

    /// Confirmation required but no interactive device is available.
    #[error("confirmation required but no interactive terminal is available")]
    PromptUnavailable { command: String },

    /// The confirmation answer could not be parsed.
    #[error("unrecognized confirmation answer '{answer}'")]
    InvalidConfirmation { answer: String },

    /// Any uncaught handler failure.
    #[error("{message}")]
    Internal { command: String, message: String },
}

impl InvocationError {
    pub fn code(&self) -> &'static str {
        match self {
            InvocationError::Removed { .. } => "E1001",
            InvocationError::CommandNotFound { .. } => "E1002",
            InvocationError::InvalidArguments { .. } => "E1003",
            InvocationError::ConfirmationDenied { .. } => "E1006",
            InvocationError::PromptUnavailable { .. } => "E1007",
            InvocationError::InvalidConfirmation { .. } => "E1008",
            InvocationError::Internal { .. } => "E5000",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            InvocationError::Removed { .. }
            | InvocationError::CommandNotFound { .. }
            | InvocationError::InvalidArguments { .. }
            | InvocationError::InvalidConfirmation { .. } => "validation",
            InvocationError::ConfirmationDenied { .. }
            | InvocationError::PromptUnavailable { .. } => "security",
            InvocationError::Internal { .. } => "internal",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            InvocationError::Internal { .. } => EXIT_INTERNAL,
            _ => EXIT_USER,
        }
    }
}
