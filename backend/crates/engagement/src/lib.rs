//! Engagement Backend Module
//!
//! Freelancer-side engagement core: who is signed in, how well they are
//! doing, and which administrator decisions they have received.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, pure services, repository traits
//! - `application/` - Session manager, decision sync, poller
//! - `infra/` - SQLite / in-memory stores, HTTP client
//!
//! ## Components
//! - `SessionManager` - single-slot session with 24h lazy expiry
//! - `scoring::compute_score` - pure weighted score over offers, projects and meetings
//! - `DecisionSync` - remote-first decisions with a durable cache fallback
//! - `DecisionPoller` - cancellable 60s refresh publishing a `DecisionFeed`
//!
//! ## Failure Model
//! Public operations never return errors. Remote and storage failures are
//! logged with `tracing` and degrade to `false`, `None` or cached data.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::EngagementConfig;
pub use application::{
    DataSource, DecisionFeed, DecisionPoller, DecisionSync, EmptyRemotePolicy, MarkReadOutcome,
    Resolved, SessionManager,
};
pub use domain::services::identity_store::IdentityStore;
pub use domain::services::scoring::{compute_score, compute_score_for, rating_for_percentage};
pub use error::{EngagementError, EngagementResult};
pub use infra::{HttpEngagementClient, MemoryStore, SqliteStore};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};

#[cfg(test)]
pub(crate) mod testing;
