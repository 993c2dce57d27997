//! In-Memory Repository Implementations
//!
//! Process-local session slot and decision cache. Nothing survives a
//! restart; used by tests and by hosts that do not want a database file.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::{decision::Decision, session::Session};
use crate::domain::repository::{DecisionCache, SessionRepository};
use crate::domain::value_object::FreelancerId;
use crate::error::EngagementResult;

#[derive(Debug, Default)]
struct State {
    session: Option<Session>,
    decisions: HashMap<FreelancerId, Vec<Decision>>,
}

/// Memory-backed session slot and decision cache
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current slot contents, bypassing expiry
    pub async fn session_snapshot(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    /// Number of freelancers with a cached decision list
    pub async fn cached_freelancers(&self) -> usize {
        self.state.read().await.decisions.len()
    }
}

impl SessionRepository for MemoryStore {
    async fn load(&self) -> EngagementResult<Option<Session>> {
        Ok(self.state.read().await.session.clone())
    }

    async fn save(&self, session: &Session) -> EngagementResult<()> {
        self.state.write().await.session = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> EngagementResult<()> {
        self.state.write().await.session = None;
        Ok(())
    }
}

impl DecisionCache for MemoryStore {
    async fn load(&self, freelancer_id: &FreelancerId) -> EngagementResult<Option<Vec<Decision>>> {
        Ok(self.state.read().await.decisions.get(freelancer_id).cloned())
    }

    async fn store(
        &self,
        freelancer_id: &FreelancerId,
        decisions: &[Decision],
    ) -> EngagementResult<()> {
        self.state
            .write()
            .await
            .decisions
            .insert(freelancer_id.clone(), decisions.to_vec());
        Ok(())
    }
}
