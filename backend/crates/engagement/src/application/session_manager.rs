//! Session Manager
//!
//! Owns the single authenticated-session slot: identifier validation,
//! session creation, lazy expiry and remote-backed authentication.
//!
//! Every public method returns a definite value. Storage and remote
//! failures are logged and degrade to `false` / `None`.

use std::sync::Arc;

use chrono::Duration;
use platform::clock::Clock;

use crate::application::config::EngagementConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::{IdentityVerifier, SessionRepository};
use crate::domain::services::identity_store::IdentityStore;
use crate::domain::value_object::FreelancerId;
use crate::error::EngagementResult;

/// Answers "who is acting right now?" for session-gated operations
#[trait_variant::make(SessionGate: Send)]
pub trait LocalSessionGate {
    async fn active_freelancer(&self) -> Option<FreelancerId>;
}

/// Session manager
pub struct SessionManager<S, V>
where
    S: SessionRepository,
    V: IdentityVerifier,
{
    identities: Arc<IdentityStore>,
    session_repo: Arc<S>,
    verifier: Arc<V>,
    clock: Arc<dyn Clock>,
    config: Arc<EngagementConfig>,
}

impl<S, V> SessionManager<S, V>
where
    S: SessionRepository + Send + Sync,
    V: IdentityVerifier + Send + Sync,
{
    pub fn new(
        identities: Arc<IdentityStore>,
        session_repo: Arc<S>,
        verifier: Arc<V>,
        clock: Arc<dyn Clock>,
        config: Arc<EngagementConfig>,
    ) -> Self {
        Self {
            identities,
            session_repo,
            verifier,
            clock,
            config,
        }
    }

    /// Local, side-effect free identifier check
    pub fn validate_identifier(&self, raw: &str) -> bool {
        self.identities.validate(raw)
    }

    /// Store a fresh session for `raw`, replacing any previous one
    ///
    /// The identifier is normalized but not checked against the identity
    /// store; use [`authenticate`](Self::authenticate) for that.
    pub async fn create_session(&self, raw: &str) -> Option<Session> {
        match self.try_create_session(raw).await {
            Ok(session) => {
                tracing::info!(freelancer_id = %session.freelancer_id, "Session created");
                Some(session)
            }
            Err(e) => {
                e.log("create_session");
                None
            }
        }
    }

    async fn try_create_session(&self, raw: &str) -> EngagementResult<Session> {
        let freelancer_id = FreelancerId::parse(raw)?;
        let session = Session::new(freelancer_id, self.clock.now());
        self.session_repo.save(&session).await?;
        Ok(session)
    }

    /// The stored session, unless it has expired
    ///
    /// An expired (or invalid-flagged) record is destroyed on the way out.
    pub async fn get_active_session(&self) -> Option<Session> {
        let session = match self.session_repo.load().await {
            Ok(session) => session?,
            Err(e) => {
                e.log("get_active_session");
                return None;
            }
        };

        if session.is_valid_at(self.clock.now(), self.ttl()) {
            return Some(session);
        }

        tracing::info!(
            freelancer_id = %session.freelancer_id,
            created_at = %session.created_at,
            "Session expired"
        );
        self.destroy_session().await;
        None
    }

    pub async fn is_authenticated(&self) -> bool {
        self.get_active_session().await.is_some()
    }

    /// Empty the session slot; harmless when already empty
    pub async fn destroy_session(&self) {
        match self.session_repo.clear().await {
            Ok(()) => tracing::debug!("Session slot cleared"),
            Err(e) => e.log("destroy_session"),
        }
    }

    pub async fn logout(&self) {
        self.destroy_session().await;
    }

    /// Authenticate `raw`, remotely when an email is supplied
    ///
    /// - remote says verified: a session is created and `true` returned
    /// - remote says not verified: `false`, no fallback
    /// - no email, or the remote could not answer: the local
    ///   [`validate_identifier`](Self::validate_identifier) result, and no
    ///   session is created
    pub async fn authenticate(&self, raw: &str, email: Option<&str>) -> bool {
        let email = email.map(str::trim).filter(|e| !e.is_empty());

        let Some(email) = email else {
            return self.validate_identifier(raw);
        };

        let freelancer_id = match FreelancerId::parse(raw) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting malformed identifier");
                return false;
            }
        };

        match self.verifier.verify(&freelancer_id, email).await {
            Ok(true) => self.create_session(freelancer_id.as_str()).await.is_some(),
            Ok(false) => {
                tracing::info!(freelancer_id = %freelancer_id, "Remote verification refused");
                false
            }
            Err(e) => {
                e.log("authenticate");
                let valid = self.validate_identifier(freelancer_id.as_str());
                tracing::info!(
                    freelancer_id = %freelancer_id,
                    valid,
                    "Falling back to local identifier validation"
                );
                valid
            }
        }
    }

    /// Time left on the active session
    pub async fn remaining(&self) -> Option<Duration> {
        let session = self.get_active_session().await?;
        Some(session.remaining(self.clock.now(), self.ttl()))
    }

    fn ttl(&self) -> Duration {
        self.config.session_ttl_chrono()
    }
}

impl<S, V> SessionGate for SessionManager<S, V>
where
    S: SessionRepository + Send + Sync,
    V: IdentityVerifier + Send + Sync,
{
    async fn active_freelancer(&self) -> Option<FreelancerId> {
        self.get_active_session().await.map(|s| s.freelancer_id)
    }
}
