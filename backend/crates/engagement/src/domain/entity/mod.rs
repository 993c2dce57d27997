//! Entity Module

pub mod activity;
pub mod decision;
pub mod score;
pub mod session;

pub use activity::{
    ActivitySet, Meeting, MeetingStatus, Offer, OfferStatus, Project, ProjectStatus,
};
pub use decision::{Decision, DecisionStats, DecisionStatus, Verdict};
pub use score::{Rating, Score, ScoreBreakdownEntry, ScoreCategory};
pub use session::Session;
