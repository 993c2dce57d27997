//! Scoring Engine
//!
//! Pure, synchronous aggregation of offers, projects and meetings into a
//! weighted [`Score`]. No I/O and no shared state, so it is safe to call
//! from anywhere, any number of times.

use crate::domain::entity::{
    ActivitySet, Meeting, MeetingStatus, Offer, OfferStatus, Project, ProjectStatus, Rating,
    Score, ScoreBreakdownEntry, ScoreCategory,
};

/// Ceiling contribution of every offer and every project
pub const MAX_POINTS_PER_RECORD: u64 = 10;

/// Percentage reported when there is nothing to measure against
pub const FALLBACK_PERCENTAGE: u8 = 95;

/// Compute the score for one freelancer's activity
pub fn compute_score(offers: &[Offer], projects: &[Project], meetings: &[Meeting]) -> Score {
    let mut accepted = 0u32;
    let mut pending = 0u32;
    let mut refused = 0u32;
    for offer in offers {
        match offer.status {
            OfferStatus::Accepted => accepted += 1,
            OfferStatus::Pending | OfferStatus::Available => pending += 1,
            OfferStatus::Refused => refused += 1,
            OfferStatus::Other => {}
        }
    }

    let completed = count_u32(projects.iter().filter(|p| p.status == ProjectStatus::Completed));
    let declined = count_u32(meetings.iter().filter(|m| m.status == MeetingStatus::Declined));

    let breakdown = ScoreCategory::ALL.map(|category| {
        let count = match category {
            ScoreCategory::AcceptedOffers => accepted,
            ScoreCategory::CompletedProjects => completed,
            ScoreCategory::RefusedMeetings => declined,
            ScoreCategory::PendingOffers => pending,
            ScoreCategory::RefusedOffers => refused,
        };
        ScoreBreakdownEntry::new(category, count)
    });

    let sum: i64 = breakdown.iter().map(|e| e.points).sum();
    let total_score = saturate_u32(sum.max(0) as u64);

    // raw collection sizes, not just the positively weighted subsets
    let ceiling = (offers.len() as u64 + projects.len() as u64) * MAX_POINTS_PER_RECORD;
    let max_possible_score = saturate_u32(ceiling);

    Score {
        total_score,
        max_possible_score,
        score_percentage: percentage(total_score, max_possible_score),
        breakdown,
    }
}

/// Convenience over an [`ActivitySet`]
pub fn compute_score_for(activity: &ActivitySet) -> Score {
    compute_score(&activity.offers, &activity.projects, &activity.meetings)
}

/// Rating band for a percentage
pub fn rating_for_percentage(pct: u8) -> Rating {
    Rating::for_percentage(pct)
}

/// `round(total / max * 100)` clamped to `0..=100`, rounding halves up
fn percentage(total: u32, max: u32) -> u8 {
    if max == 0 {
        return FALLBACK_PERCENTAGE;
    }
    let (total, max) = (u64::from(total), u64::from(max));
    let rounded = (total * 100 + max / 2) / max;
    rounded.min(100) as u8
}

fn count_u32<I: Iterator>(iter: I) -> u32 {
    saturate_u32(iter.count() as u64)
}

fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offers(statuses: &[OfferStatus]) -> Vec<Offer> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| Offer {
                id: format!("O{i}"),
                title: String::new(),
                status: *s,
            })
            .collect()
    }

    fn projects(statuses: &[ProjectStatus]) -> Vec<Project> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| Project {
                id: format!("P{i}"),
                title: String::new(),
                status: *s,
            })
            .collect()
    }

    fn meetings(statuses: &[MeetingStatus]) -> Vec<Meeting> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| Meeting {
                id: format!("M{i}"),
                title: String::new(),
                status: *s,
            })
            .collect()
    }

    #[test]
    fn test_mixed_activity() {
        use MeetingStatus as M;
        use OfferStatus as O;
        use ProjectStatus as P;

        let score = compute_score(
            &offers(&[O::Accepted, O::Accepted, O::Pending, O::Refused, O::Refused]),
            &projects(&[P::Completed, P::InProgress]),
            &meetings(&[M::Declined]),
        );

        assert_eq!(score.total_score, 19);
        assert_eq!(score.max_possible_score, 70);
        assert_eq!(score.score_percentage, 27);

        assert_eq!(score.entry(ScoreCategory::AcceptedOffers).points, 20);
        assert_eq!(score.entry(ScoreCategory::CompletedProjects).points, 10);
        assert_eq!(score.entry(ScoreCategory::RefusedMeetings).points, -5);
        assert_eq!(score.entry(ScoreCategory::PendingOffers).count, 1);
        assert_eq!(score.entry(ScoreCategory::RefusedOffers).points, -4);
    }

    #[test]
    fn test_available_counts_as_pending() {
        let score = compute_score(
            &offers(&[OfferStatus::Available, OfferStatus::Pending]),
            &[],
            &[],
        );
        assert_eq!(score.entry(ScoreCategory::PendingOffers).count, 2);
        assert_eq!(score.entry(ScoreCategory::PendingOffers).points, -4);
    }

    #[test]
    fn test_negative_sum_clamps_to_zero() {
        let score = compute_score(
            &offers(&[OfferStatus::Refused; 4]),
            &[],
            &meetings(&[MeetingStatus::Declined; 3]),
        );
        assert_eq!(score.total_score, 0);
        assert_eq!(score.max_possible_score, 40);
        assert_eq!(score.score_percentage, 0);
    }

    #[test]
    fn test_zero_ceiling_uses_fallback() {
        let score = compute_score(&[], &[], &meetings(&[MeetingStatus::Declined]));
        assert_eq!(score.max_possible_score, 0);
        assert_eq!(score.total_score, 0);
        assert_eq!(score.score_percentage, FALLBACK_PERCENTAGE);
    }

    #[test]
    fn test_perfect_record() {
        let score = compute_score(
            &offers(&[OfferStatus::Accepted; 3]),
            &projects(&[ProjectStatus::Completed; 2]),
            &meetings(&[MeetingStatus::Accepted]),
        );
        assert_eq!(score.total_score, 50);
        assert_eq!(score.score_percentage, 100);
        assert_eq!(score.rating(), Rating::Excellent);
    }

    #[test]
    fn test_unknown_statuses_are_ignored_but_count_toward_ceiling() {
        let score = compute_score(
            &offers(&[OfferStatus::Other, OfferStatus::Accepted]),
            &projects(&[ProjectStatus::Other]),
            &meetings(&[MeetingStatus::Other]),
        );
        assert_eq!(score.total_score, 10);
        assert_eq!(score.max_possible_score, 30);
        assert_eq!(score.score_percentage, 33);
    }

    #[test]
    fn test_rounding_half_up() {
        // 1 accepted out of 8 offers: 10 / 80 = 12.5% -> 13
        let mut statuses = vec![OfferStatus::Other; 7];
        statuses.push(OfferStatus::Accepted);
        let score = compute_score(&offers(&statuses), &[], &[]);
        assert_eq!(score.score_percentage, 13);
    }

    #[test]
    fn test_percentage_bounds_over_many_mixes() {
        use OfferStatus as O;
        let all = [O::Available, O::Pending, O::Accepted, O::Refused, O::Other];
        for a in all {
            for b in all {
                for completed in 0..3 {
                    let mut ps = vec![ProjectStatus::Completed; completed];
                    ps.push(ProjectStatus::Cancelled);
                    let score = compute_score(
                        &offers(&[a, b]),
                        &projects(&ps),
                        &meetings(&[MeetingStatus::Declined; 2]),
                    );
                    assert!(score.score_percentage <= 100);
                    assert!(score.total_score <= score.max_possible_score);
                }
            }
        }
    }

    #[test]
    fn test_rating_helper_matches_entity() {
        assert_eq!(rating_for_percentage(27), Rating::NeedsImprovement);
        assert_eq!(rating_for_percentage(85).label(), "Very Good");
    }
}
