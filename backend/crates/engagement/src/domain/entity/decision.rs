//! Decision Entity
//!
//! An administrator's approve/reject ruling on a submitted deliverable,
//! with read-state tracking.
//!
//! ## State machine
//! `sent → read`, and `read` is terminal. `read_at` is set on that single
//! transition and never touched again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::FreelancerId;

/// Ruling issued by an administrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Approved,
    Rejected,
}

/// Delivery state of a decision towards the freelancer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Sent,
    Read,
}

/// Administrator decision about a deliverable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: String,
    pub freelancer_id: FreelancerId,
    pub deliverable_title: String,
    pub decision: Verdict,
    #[serde(default)]
    pub observation: String,
    pub admin_id: String,
    pub status: DecisionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Decision {
    #[inline]
    pub fn is_unread(&self) -> bool {
        self.status == DecisionStatus::Sent
    }

    /// Apply the `sent → read` transition
    ///
    /// Returns `true` when the decision moved; a decision that is already
    /// read keeps its original `read_at`.
    pub fn mark_read(&mut self, now: DateTime<Utc>) -> bool {
        match self.status {
            DecisionStatus::Sent => {
                self.status = DecisionStatus::Read;
                self.read_at = Some(now);
                true
            }
            DecisionStatus::Read => false,
        }
    }

    /// Keep a `read` state recorded locally that the remote has not seen yet
    ///
    /// Returns `true` when `self` was still `sent`; it then takes `local`'s
    /// `read_at`.
    pub fn keep_local_read(&mut self, local: &Decision) -> bool {
        if !self.is_unread() || local.is_unread() {
            return false;
        }
        self.status = DecisionStatus::Read;
        self.read_at = local.read_at.or(Some(local.created_at));
        true
    }

    /// Make `read_at` agree with `status`
    ///
    /// A `read` decision without a timestamp takes `created_at`, a `sent`
    /// one drops any timestamp. Returns `true` when something was repaired.
    pub fn normalize_read_state(&mut self) -> bool {
        match (self.status, self.read_at) {
            (DecisionStatus::Read, None) => {
                self.read_at = Some(self.created_at);
                true
            }
            (DecisionStatus::Sent, Some(_)) => {
                self.read_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Aggregate counters over a decision list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionStats {
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    pub unread: usize,
    pub read: usize,
}

impl DecisionStats {
    pub fn from_decisions(decisions: &[Decision]) -> Self {
        decisions.iter().fold(Self::default(), |mut stats, d| {
            stats.total += 1;
            match d.decision {
                Verdict::Approved => stats.approved += 1,
                Verdict::Rejected => stats.rejected += 1,
            }
            match d.status {
                DecisionStatus::Sent => stats.unread += 1,
                DecisionStatus::Read => stats.read += 1,
            }
            stats
        })
    }
}
