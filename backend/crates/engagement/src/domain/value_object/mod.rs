//! Value Object Module

pub mod freelancer_id;

pub use freelancer_id::{FREELANCER_ID_MIN_LENGTH, FreelancerId, FreelancerIdError};
