//! Domain Layer
//!
//! Contains entities, value objects, pure services and the persistence /
//! remote-service traits implemented by the infrastructure layer.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{Decision, DecisionStats, DecisionStatus, Score, Session, Verdict};
pub use repository::{DecisionCache, IdentityVerifier, RemoteDecisionService, SessionRepository};
pub use services::identity_store::IdentityStore;
pub use value_object::FreelancerId;
