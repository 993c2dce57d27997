//! Application Layer
//!
//! Session handling, decision sync and the background poller.

pub mod config;
pub mod decision_sync;
pub mod fallback;
pub mod poller;
pub mod session_manager;

// Re-exports
pub use config::EngagementConfig;
pub use decision_sync::{DecisionSync, MarkReadOutcome, ScopedDecisions, compute_stats};
pub use fallback::{DataSource, DualSource, EmptyRemotePolicy, ReplicaSource, Resolved};
pub use poller::{DecisionFeed, DecisionPoller};
pub use session_manager::{SessionGate, SessionManager};
