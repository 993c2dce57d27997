//! Session Entity
//!
//! The authenticated-state record that gates every per-freelancer
//! operation. Exactly one session occupies the persistence slot at a time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::FreelancerId;

/// Authenticated freelancer session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Canonical identifier of the acting freelancer
    pub freelancer_id: FreelancerId,
    /// Creation instant; the TTL counts from here
    pub created_at: DateTime<Utc>,
    /// Always true for records written by this crate
    pub valid: bool,
}

impl Session {
    pub fn new(freelancer_id: FreelancerId, now: DateTime<Utc>) -> Self {
        Self {
            freelancer_id,
            created_at: now,
            valid: true,
        }
    }

    /// Strictly older than `ttl` at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.created_at) > ttl
    }

    /// Usable at `now`: flagged valid and not expired, whatever else was persisted
    pub fn is_valid_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.valid && !self.is_expired_at(now, ttl)
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self, now: DateTime<Utc>, ttl: Duration) -> Duration {
        let elapsed = now.signed_duration_since(self.created_at);
        ttl.checked_sub(&elapsed)
            .unwrap_or_else(Duration::zero)
            .max(Duration::zero())
    }
}
