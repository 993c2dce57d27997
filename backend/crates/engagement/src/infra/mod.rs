//! Infrastructure Layer
//!
//! Local stores and the remote engagement service client.

pub mod dto;
pub mod http;
pub mod memory;
pub mod sqlite;

pub use http::HttpEngagementClient;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
