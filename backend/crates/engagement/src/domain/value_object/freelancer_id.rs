//! Freelancer Identifier Value Object
//!
//! The opaque string a freelancer authenticates with.
//!
//! ## Normalization
//! - Surrounding whitespace is trimmed
//! - The canonical form is uppercase (`freel123` → `FREEL123`)
//!
//! ## Invariants
//! - Non-empty after normalization
//! - No whitespace inside the identifier
//!
//! Minimum length is a *validation* rule, not a construction rule: a
//! session can be created for any well-formed id, while
//! [`IdentityStore::validate`](crate::domain::services::identity_store::IdentityStore::validate)
//! rejects ids shorter than [`FREELANCER_ID_MIN_LENGTH`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiers shorter than this are rejected without hashing
pub const FREELANCER_ID_MIN_LENGTH: usize = 4;

/// Error returned when an identifier cannot be normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreelancerIdError {
    /// Identifier is empty after trimming
    Empty,

    /// Identifier contains whitespace in the middle
    ContainsWhitespace,
}

impl fmt::Display for FreelancerIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Freelancer identifier cannot be empty"),
            Self::ContainsWhitespace => {
                write!(f, "Freelancer identifier cannot contain whitespace")
            }
        }
    }
}

impl std::error::Error for FreelancerIdError {}

/// Canonical (trimmed, uppercased) freelancer identifier
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FreelancerId(String);

impl FreelancerId {
    /// Normalize raw input and wrap it
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, FreelancerIdError> {
        let canonical = Self::normalize(raw.as_ref());
        if canonical.is_empty() {
            return Err(FreelancerIdError::Empty);
        }
        if canonical.chars().any(char::is_whitespace) {
            return Err(FreelancerIdError::ContainsWhitespace);
        }
        Ok(Self(canonical))
    }

    /// Trim and uppercase, without validating
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FreelancerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for FreelancerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FreelancerId({})", self.0)
    }
}

impl AsRef<str> for FreelancerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FreelancerId {
    type Error = FreelancerIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<FreelancerId> for String {
    fn from(id: FreelancerId) -> Self {
        id.0
    }
}
