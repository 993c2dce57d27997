//! Score Entity
//!
//! Transient result of the scoring engine. Computed fresh on every request
//! and never persisted.

use serde::Serialize;

/// Scoring category, one per weighted bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreCategory {
    AcceptedOffers,
    CompletedProjects,
    RefusedMeetings,
    PendingOffers,
    RefusedOffers,
}

impl ScoreCategory {
    /// Breakdown order
    pub const ALL: [ScoreCategory; 5] = [
        ScoreCategory::AcceptedOffers,
        ScoreCategory::CompletedProjects,
        ScoreCategory::RefusedMeetings,
        ScoreCategory::PendingOffers,
        ScoreCategory::RefusedOffers,
    ];

    /// Signed points per record in this category
    pub const fn weight(&self) -> i64 {
        match self {
            ScoreCategory::AcceptedOffers => 10,
            ScoreCategory::CompletedProjects => 10,
            ScoreCategory::RefusedMeetings => -5,
            ScoreCategory::PendingOffers => -2,
            ScoreCategory::RefusedOffers => -2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdownEntry {
    pub category: ScoreCategory,
    pub count: u32,
    /// `count * weight`
    pub points: i64,
}

impl ScoreBreakdownEntry {
    pub fn new(category: ScoreCategory, count: u32) -> Self {
        Self {
            category,
            count,
            points: i64::from(count) * category.weight(),
        }
    }
}

/// Weighted performance summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Sum of all entries' points, clamped at zero
    pub total_score: u32,
    pub max_possible_score: u32,
    /// Always within `0..=100`
    pub score_percentage: u8,
    pub breakdown: [ScoreBreakdownEntry; 5],
}

impl Score {
    pub fn entry(&self, category: ScoreCategory) -> &ScoreBreakdownEntry {
        // breakdown is always laid out in ScoreCategory::ALL order
        let index = ScoreCategory::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or_default();
        &self.breakdown[index]
    }

    pub fn rating(&self) -> Rating {
        Rating::for_percentage(self.score_percentage)
    }
}

/// Qualitative band for a score percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rating {
    Excellent,
    VeryGood,
    Good,
    Average,
    NeedsImprovement,
}

impl Rating {
    /// Bands are compared with `>=` from the top down
    pub fn for_percentage(pct: u8) -> Self {
        match pct {
            90.. => Rating::Excellent,
            80..=89 => Rating::VeryGood,
            70..=79 => Rating::Good,
            60..=69 => Rating::Average,
            _ => Rating::NeedsImprovement,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::VeryGood => "Very Good",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::NeedsImprovement => "Needs Improvement",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Rating::Excellent => "Outstanding track record across offers and projects",
            Rating::VeryGood => "Strong, reliable engagement with few misses",
            Rating::Good => "Solid engagement with room to grow",
            Rating::Average => "Mixed results; follow up on pending and refused work",
            Rating::NeedsImprovement => "Low completion rate; focus on accepting and finishing work",
        }
    }
}
