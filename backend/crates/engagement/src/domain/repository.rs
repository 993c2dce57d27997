//! Repository Traits
//!
//! Interfaces for persistence and for the remote engagement service.
//! Implementations are in the infrastructure layer.

use crate::domain::entity::{decision::Decision, session::Session};
use crate::domain::value_object::FreelancerId;
use crate::error::EngagementResult;

/// Single-slot session persistence
///
/// At most one session is stored; `save` overwrites whatever is there.
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Read the slot
    async fn load(&self) -> EngagementResult<Option<Session>>;

    /// Overwrite the slot
    async fn save(&self, session: &Session) -> EngagementResult<()>;

    /// Empty the slot; succeeds when already empty
    async fn clear(&self) -> EngagementResult<()>;
}

/// Durable replica of each freelancer's last-known decision list
#[trait_variant::make(DecisionCache: Send)]
pub trait LocalDecisionCache {
    /// Last stored list, `None` when nothing was ever stored
    async fn load(&self, freelancer_id: &FreelancerId) -> EngagementResult<Option<Vec<Decision>>>;

    /// Replace the stored list
    async fn store(&self, freelancer_id: &FreelancerId, decisions: &[Decision])
    -> EngagementResult<()>;
}

/// Remote service of record for decisions
#[trait_variant::make(RemoteDecisionService: Send)]
pub trait LocalRemoteDecisionService {
    /// All decisions issued to a freelancer
    async fn list_decisions(&self, freelancer_id: &FreelancerId) -> EngagementResult<Vec<Decision>>;

    /// Server-side `sent → read` transition
    async fn mark_read(&self, decision_id: &str, freelancer_id: &FreelancerId)
    -> EngagementResult<()>;
}

/// Remote identity binding between a freelancer id and an email
#[trait_variant::make(IdentityVerifier: Send)]
pub trait LocalIdentityVerifier {
    /// `Ok(false)` is a definite "no"; `Err` means the verifier could not answer
    async fn verify(&self, freelancer_id: &FreelancerId, email: &str) -> EngagementResult<bool>;
}
