//! Engagement Error Types
//!
//! Errors raised inside the engagement core. They never cross the public
//! component boundary: session and sync operations log them and degrade to
//! `false`, `None`, or cached data instead.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::FreelancerIdError;

/// Engagement-specific result type alias
pub type EngagementResult<T> = Result<T, EngagementError>;

/// Engagement-specific error variants
#[derive(Debug, Error)]
pub enum EngagementError {
    /// Identifier could not be normalized
    #[error("Invalid freelancer identifier: {0}")]
    InvalidIdentifier(#[from] FreelancerIdError),

    /// No active session when one was required
    #[error("No active session")]
    NoActiveSession,

    /// Remote service failed or answered with a non-2xx status
    #[error("Remote service error: {0}")]
    Remote(#[from] AppError),

    /// Local store failure
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Local store schema migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Cached blob could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cached blob does not match its stored digest
    #[error("Cached replica for {freelancer_id} failed its integrity check")]
    CorruptedReplica { freelancer_id: String },

    /// HTTP client could not be configured
    #[error("HTTP client setup error: {0}")]
    HttpSetup(#[from] platform::http::HttpClientError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngagementError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngagementError::InvalidIdentifier(_) => ErrorKind::BadRequest,
            EngagementError::NoActiveSession => ErrorKind::Unauthorized,
            EngagementError::Remote(e) => e.kind(),
            EngagementError::Storage(sqlx::Error::PoolTimedOut) => ErrorKind::ServiceUnavailable,
            EngagementError::CorruptedReplica { .. } => ErrorKind::UnprocessableEntity,
            EngagementError::Storage(_)
            | EngagementError::Migration(_)
            | EngagementError::Serialization(_)
            | EngagementError::HttpSetup(_)
            | EngagementError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Remote failures that the next sync may recover from
    pub fn is_transient(&self) -> bool {
        self.kind().is_transient()
    }

    /// Log the error with appropriate level
    ///
    /// `operation` names what was being attempted when it happened.
    pub fn log(&self, operation: &'static str) {
        match self {
            EngagementError::Remote(e) if e.is_transient() => {
                tracing::warn!(operation, error = %e, "Remote engagement service unavailable");
            }
            EngagementError::Remote(e) if e.kind().is_client_error() => {
                tracing::warn!(
                    operation,
                    error = %e,
                    upstream_status = e.upstream_status(),
                    "Remote engagement service rejected the call"
                );
            }
            EngagementError::Remote(e) => {
                tracing::error!(
                    operation,
                    error = %e,
                    upstream_status = e.upstream_status(),
                    "Remote engagement service failed"
                );
            }
            EngagementError::Storage(e) => {
                tracing::error!(operation, error = %e, "Engagement storage error");
            }
            EngagementError::Migration(e) => {
                tracing::error!(operation, error = %e, "Engagement storage migration failed");
            }
            EngagementError::CorruptedReplica { freelancer_id } => {
                tracing::warn!(operation, freelancer_id = %freelancer_id, "Ignoring corrupted cached replica");
            }
            EngagementError::Internal(msg) => {
                tracing::error!(operation, message = %msg, "Engagement internal error");
            }
            _ => {
                tracing::debug!(operation, error = %self, "Engagement error");
            }
        }
    }
}
