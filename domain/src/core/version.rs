//! Command and application versions.
//!
//! A [`Version`] is a dotted numeric triple (`major.minor.patch`) compared
//! component-wise as integers, not lexically: `1.10.0 > 1.9.0`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a version string does not parse as `X.Y.Z`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version '{input}': expected major.minor.patch")]
pub struct VersionParseError {
    pub input: String,
}

/// A semantic version triple.
///
/// Ordering is derived from field order, so comparisons are component-wise
/// integer comparisons.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError {
            input: s.to_string(),
        };

        let mut parts = s.split('.');
        let mut next = |p: Option<&str>| -> Result<u64, VersionParseError> {
            p.ok_or_else(err)?.parse::<u64>().map_err(|_| err())
        };

        let major = next(parts.next())?;
        let minor = next(parts.next())?;
        let patch = next(parts.next())?;
        if parts.next().is_some() {
            return Err(err());
        }

        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}
