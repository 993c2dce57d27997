//! Identity Store
//!
//! Process-wide table mapping the 32-bit hash of a canonical freelancer
//! identifier to that identifier. Built once at startup and read-only
//! afterwards.
//!
//! This is a lookup convenience that keeps plaintext comparisons out of the
//! validation path. It is NOT a credential store: membership is decided by
//! hash alone, so colliding strings validate too.

use std::collections::HashMap;

use platform::crypto::identifier_hash;

use crate::domain::value_object::{FREELANCER_ID_MIN_LENGTH, FreelancerId};

/// Identifiers known to every deployment
const DEFAULT_ROSTER: &[&str] = &[
    "FREEL123", "FREEL456", "FREEL789", "FREEL001", "FREEL002", "FREEL003",
];

/// Hash of a normalized identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashedId(i32);

impl HashedId {
    /// Hash an already-normalized identifier
    pub fn of(normalized: &str) -> Self {
        Self(identifier_hash(normalized))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Keyed table `HashedId -> FreelancerId`
#[derive(Debug, Clone, Default)]
pub struct IdentityStore {
    entries: HashMap<HashedId, FreelancerId>,
}

impl IdentityStore {
    /// Build from canonical identifiers; malformed entries are skipped
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::default();
        store.extend(ids);
        store
    }

    /// The built-in roster
    pub fn with_default_roster() -> Self {
        Self::from_ids(DEFAULT_ROSTER)
    }

    /// Add more identifiers (e.g. from configuration) before the store is shared
    pub fn with_extra<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extend(ids);
        self
    }

    fn extend<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in ids {
            match FreelancerId::parse(raw.as_ref()) {
                Ok(id) => {
                    self.entries.insert(HashedId::of(id.as_str()), id);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed identity roster entry");
                }
            }
        }
    }

    /// Normalize, length-check, hash, then test membership
    ///
    /// Inputs shorter than [`FREELANCER_ID_MIN_LENGTH`] characters are
    /// rejected before hashing.
    pub fn validate(&self, raw: &str) -> bool {
        let normalized = FreelancerId::normalize(raw);
        if normalized.chars().count() < FREELANCER_ID_MIN_LENGTH {
            return false;
        }
        self.entries.contains_key(&HashedId::of(&normalized))
    }
}
