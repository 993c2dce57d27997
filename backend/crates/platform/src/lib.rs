//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Hashing utilities (identifier hash, SHA-256, Base64)
//! - A clock abstraction for time-dependent checks
//! - HTTP client construction and endpoint building
//! - Cancellable periodic tasks

pub mod clock;
pub mod crypto;
pub mod http;
pub mod task;
