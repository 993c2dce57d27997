//! Domain Services
//!
//! Pure domain logic: identifier lookup and score computation.

pub mod identity_store;
pub mod scoring;
