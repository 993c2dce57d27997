//! Activity records consumed by scoring
//!
//! Offers, projects and meetings are created and mutated by other
//! subsystems. Only their status matters here; statuses this crate does not
//! know deserialize to `Other` and are ignored by scoring.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Available,
    Pending,
    Accepted,
    Refused,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    InProgress,
    Completed,
    Cancelled,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Scheduled,
    Accepted,
    Declined,
    Completed,
    #[serde(other)]
    Other,
}

/// Job offer addressed to the freelancer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub status: OfferStatus,
}

/// Project the freelancer works on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub status: ProjectStatus,
}

/// Meeting proposed to the freelancer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub status: MeetingStatus,
}

/// The three collections a score is computed from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySet {
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}
