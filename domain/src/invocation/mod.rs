//! Invocation entities: execution context, error taxonomy, result envelope.
//!
//! Every invocation — regardless of which surface triggered it — produces
//! exactly one [`Envelope`](envelope::Envelope): `ok: true` with a
//! sanitized result and app-qualified meta, or `ok: false` with a coded,
//! categorized error object. The taxonomy and its exit-code mapping live in
//! [`error`], and must stay bit-exact across every output surface.

pub mod context;
pub mod envelope;
pub mod error;

pub use context::{ResponseFormat, ToolContext};
pub use envelope::{Envelope, EnvelopeMeta, ErrorObject, Suggestion};
pub use error::{InvocationError, EXIT_INTERNAL, EXIT_SUCCESS, EXIT_USER};
