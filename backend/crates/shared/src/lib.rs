//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! engagement crates:
//! - Error classification ([`error::kind::ErrorKind`])
//! - The unified error type and result alias ([`error::app_error::AppError`])
//! - Conversions from the third-party errors the workspace meets
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
