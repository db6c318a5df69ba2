//! Core domain concepts shared across all subdomains.
//!
//! - [`version::Version`] — dotted numeric triple used for command lineages
//!   and the host application version
//! - [`sanitize`] — the output sanitizer applied to every string leaf of a
//!   result before it reaches any surface
//! - [`string`] — small string utilities

pub mod sanitize;
pub mod string;
pub mod version;
