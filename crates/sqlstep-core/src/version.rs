//! Migration version identifier
//!
//! A `Version` is parsed once (from a filename prefix or a stored row) and is
//! valid from then on: non-empty, starts with an ASCII digit, and contains only
//! ASCII alphanumerics, `.` or `-`. Ordering is lexical, which orders
//! zero-padded sequence numbers (`0001` < `0002` < `0010`) numerically.

use crate::errors::{MigrateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version(String);

impl Version {
    /// Parse and validate a version string
    ///
    /// # Errors
    ///
    /// Returns `MigrateError::InvalidVersion` if the input is empty, does not
    /// start with a digit, or contains characters outside `[A-Za-z0-9.-]`.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| MigrateError::InvalidVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let first = input.chars().next().ok_or_else(|| invalid("version is empty"))?;
        if !first.is_ascii_digit() {
            return Err(invalid("version must start with a digit"));
        }
        if let Some(bad) = input
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
        {
            return Err(invalid(&format!("unexpected character {:?}", bad)));
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the version when it is purely digits
    ///
    /// Used to pick the next sequence number when scaffolding.
    pub fn sequence_number(&self) -> Option<u64> {
        if self.0.bytes().all(|b| b.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }

    /// Character width of the version (zero padding included)
    pub fn width(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Version {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = MigrateError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.0
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
