//! Confirmation port for the security gate.
//!
//! Following the Ports and Adapters pattern:
//! - **Port**: [`ConfirmationPort`] — defined here in the application layer
//! - **Adapter**: `TtyConfirmation` — implemented in the presentation layer
//!   against the process terminal or the platform console device
//!
//! The pipeline asks for at most one confirmation per invocation, and only
//! when the security gate requires it.

use async_trait::async_trait;
use thiserror::Error;

/// Failure while *obtaining* a confirmation — distinct from the user
/// answering "no", which is a successful `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmationError {
    /// No interactive terminal or console device could be opened.
    #[error("no interactive confirmation device available: {0}")]
    Unavailable(String),

    /// The answer was read but not recognized.
    #[error("unrecognized confirmation answer '{answer}'")]
    InvalidAnswer { answer: String },
}

/// Port for interactive confirmation of destructive commands.
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Ask the user to confirm. `default` is returned on an empty answer
    /// or end-of-stream.
    async fn confirm(&self, prompt: &str, default: bool) -> Result<bool, ConfirmationError>;
}

/// Fixed-answer implementation for tests and headless wiring.
pub struct StaticConfirmation {
    answer: Result<bool, ConfirmationError>,
}

impl StaticConfirmation {
    pub fn always(answer: bool) -> Self {
        Self { answer: Ok(answer) }
    }

    pub fn unavailable() -> Self {
        Self {
            answer: Err(ConfirmationError::Unavailable("static".into())),
        }
    }
}

#[async_trait]
impl ConfirmationPort for StaticConfirmation {
    async fn confirm(&self, _prompt: &str, _default: bool) -> Result<bool, ConfirmationError> {
        self.answer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_confirmation() {
        assert_eq!(
            StaticConfirmation::always(true).confirm("?", false).await,
            Ok(true)
        );
        assert_eq!(
            StaticConfirmation::always(false).confirm("?", true).await,
            Ok(false)
        );
        assert!(matches!(
            StaticConfirmation::unavailable().confirm("?", false).await,
            Err(ConfirmationError::Unavailable(_))
        ));
    }
}
