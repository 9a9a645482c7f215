/// Follow Suggestion Scorer
///
/// Scores other users as follow candidates. Same pattern as the content
/// scorer with its own feature set and weights:
///
/// | Signal             | Weight |
/// |--------------------|--------|
/// | similarity         | 0.25   |
/// | mutual connections | 0.30   |
/// | activity           | 0.20   |
/// | location           | 0.15   |
/// | interest overlap   | 0.10   |
use crate::models::{Candidate, EngagementStats, FollowRequest, FollowScoreBreakdown, Location};
use crate::services::graph::{FollowerCountEstimate, MutualConnectionCounter};
use crate::utils::{clamp_unit, common_interests, haversine_distance_km};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Location score reaches 0 at this distance
pub const FOLLOW_LOCATION_FALLOFF_KM: f64 = 100.0;
/// Location score when neither city, state nor coordinates can be compared
pub const DEFAULT_LOCATION_SCORE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowWeights {
    pub similarity: f64,
    pub mutual_connections: f64,
    pub activity: f64,
    pub location: f64,
    pub interest_overlap: f64,
}

impl FollowWeights {
    pub const DEFAULT: FollowWeights = FollowWeights {
        similarity: 0.25,
        mutual_connections: 0.30,
        activity: 0.20,
        location: 0.15,
        interest_overlap: 0.10,
    };

    pub fn total(&self) -> f64 {
        self.similarity + self.mutual_connections + self.activity + self.location + self.interest_overlap
    }

    pub fn combine(&self, b: &FollowScoreBreakdown) -> f64 {
        self.similarity * b.similarity
            + self.mutual_connections * b.mutual_connections
            + self.activity * b.activity
            + self.location * b.location
            + self.interest_overlap * b.interest_overlap
    }
}

pub struct FollowScorer {
    mutual_connections: Arc<dyn MutualConnectionCounter + Send + Sync>,
}

impl Default for FollowScorer {
    fn default() -> Self {
        Self::new(Arc::new(FollowerCountEstimate))
    }
}

impl FollowScorer {
    pub fn new(mutual_connections: Arc<dyn MutualConnectionCounter + Send + Sync>) -> Self {
        Self { mutual_connections }
    }

    pub fn score(
        &self,
        request: &FollowRequest,
        candidate: &Candidate,
        now: DateTime<Utc>,
    ) -> FollowScoreBreakdown {
        let mut breakdown = FollowScoreBreakdown {
            similarity: similarity_score(&request.interests, &candidate.interests),
            mutual_connections: clamp_unit(
                self.mutual_connections
                    .mutual_connection_score(request, candidate),
            ),
            activity: activity_score(&candidate.engagement, now),
            location: location_score(request.location.as_ref(), candidate.location.as_ref()),
            interest_overlap: interest_overlap_score(&request.interests, &candidate.interests),
            final_score: 0.0,
        };
        breakdown.final_score = FollowWeights::DEFAULT.combine(&breakdown);

        debug!(
            user_id = %candidate.id,
            similarity = breakdown.similarity,
            mutual_connections = breakdown.mutual_connections,
            activity = breakdown.activity,
            location = breakdown.location,
            interest_overlap = breakdown.interest_overlap,
            score = breakdown.final_score,
            "Follow score computed"
        );

        breakdown
    }
}

/// Shared interests over the larger interest list
pub fn similarity_score(a: &[String], b: &[String]) -> f64 {
    let larger = a.len().max(b.len());
    if larger == 0 {
        return 0.0;
    }
    clamp_unit(common_interests(a, b).len() as f64 / larger as f64)
}

/// Shared interests over the smaller interest list
pub fn interest_overlap_score(a: &[String], b: &[String]) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    clamp_unit(common_interests(a, b).len() as f64 / smaller as f64)
}

/// Base 0.5 plus bounded post/event contributions and a recency bonus
pub fn activity_score(stats: &EngagementStats, now: DateTime<Utc>) -> f64 {
    let mut score = 0.5;

    score += (stats.posts_count as f64 / 100.0).min(1.0) * 0.2;
    score += (stats.events_created as f64 / 20.0).min(1.0) * 0.2;

    if let Some(last_active) = stats.last_active_at {
        // Fractional days: 7 days and an hour is past the first tier
        let days = (now - last_active).num_seconds() as f64 / 86_400.0;
        score += match days {
            d if d <= 7.0 => 0.3,
            d if d <= 30.0 => 0.2,
            d if d <= 90.0 => 0.1,
            _ => 0.0,
        };
    }

    clamp_unit(score)
}

fn same_label(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.trim().is_empty() && a.trim().eq_ignore_ascii_case(b.trim()),
        _ => false,
    }
}

/// Same city 1.0, same state 0.7, else distance falloff over 100 km when both
/// sides carry a coordinate, else 0.3
pub fn location_score(requester: Option<&Location>, candidate: Option<&Location>) -> f64 {
    let (a, b) = match (requester, candidate) {
        (Some(a), Some(b)) => (a, b),
        _ => return DEFAULT_LOCATION_SCORE,
    };

    if same_label(&a.city, &b.city) {
        return 1.0;
    }
    if same_label(&a.state, &b.state) {
        return 0.7;
    }

    match (a.coordinates(), b.coordinates()) {
        (Some((lat1, lon1)), Some((lat2, lon2))) => {
            let distance = haversine_distance_km(lat1, lon1, lat2, lon2);
            clamp_unit(1.0 - distance / FOLLOW_LOCATION_FALLOFF_KM)
        }
        _ => DEFAULT_LOCATION_SCORE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateKind;
    use crate::services::graph::MockMutualConnectionCounter;
    use chrono::Duration;
    use tracing_test::traced_test;
    use uuid::Uuid;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!((FollowWeights::DEFAULT.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_and_overlap() {
        let a = strings(&["music", "art", "hiking", "food"]);
        let b = strings(&["Music", "Art"]);

        assert!((similarity_score(&a, &b) - 0.5).abs() < 1e-9);
        assert!((interest_overlap_score(&a, &b) - 1.0).abs() < 1e-9);
        assert_eq!(similarity_score(&[], &[]), 0.0);
        assert_eq!(interest_overlap_score(&a, &[]), 0.0);
    }

    #[test]
    fn test_activity_score_tiers() {
        let now = Utc::now();

        let idle = EngagementStats::default();
        assert_eq!(activity_score(&idle, now), 0.5);

        let busy = EngagementStats {
            posts_count: 50,
            events_created: 5,
            last_active_at: Some(now - Duration::days(20)),
            ..Default::default()
        };
        // 0.5 + 0.1 + 0.05 + 0.2
        assert!((activity_score(&busy, now) - 0.85).abs() < 1e-9);

        let stale = EngagementStats {
            last_active_at: Some(now - Duration::days(60)),
            ..Default::default()
        };
        assert!((activity_score(&stale, now) - 0.6).abs() < 1e-9);

        let maxed = EngagementStats {
            posts_count: 500,
            events_created: 100,
            last_active_at: Some(now),
            ..Default::default()
        };
        assert_eq!(activity_score(&maxed, now), 1.0);
    }

    #[test]
    fn test_activity_recency_uses_fractional_days() {
        let now = Utc::now();
        let last_seen = |ago: Duration| EngagementStats {
            last_active_at: Some(now - ago),
            ..Default::default()
        };

        let cases = [
            (Duration::days(7), 0.8),
            (Duration::days(7) + Duration::hours(1), 0.7),
            (Duration::days(7) + Duration::hours(23), 0.7),
            (Duration::days(30) + Duration::hours(1), 0.6),
            (Duration::days(90) + Duration::hours(1), 0.5),
        ];
        for (ago, expected) in cases {
            let score = activity_score(&last_seen(ago), now);
            assert!((score - expected).abs() < 1e-9, "{:?} ago scored {}", ago, score);
        }
    }

    #[test]
    fn test_location_score() {
        let springfield = Location::new(39.78, -89.65).with_city("Springfield", "IL");
        let chicago = Location::new(41.88, -87.63).with_city("Chicago", "IL");
        let neighbour = Location::new(39.80, -89.60).with_city("Sherman", "MO");
        let far = Location::new(34.05, -118.24).with_city("Los Angeles", "CA");

        assert_eq!(location_score(Some(&springfield), Some(&springfield.clone())), 1.0);
        assert_eq!(location_score(Some(&springfield), Some(&chicago)), 0.7);

        let nearby = location_score(Some(&springfield), Some(&neighbour));
        assert!(nearby > 0.9 && nearby < 1.0);

        assert_eq!(location_score(Some(&springfield), Some(&far)), 0.0);
        assert_eq!(location_score(None, Some(&far)), DEFAULT_LOCATION_SCORE);
    }

    #[test]
    fn test_location_score_labels_without_coordinates() {
        let austin = Location::labelled("Austin", "TX");
        let dallas = Location::labelled("Dallas", "TX");
        let denver = Location::labelled("Denver", "CO");

        assert_eq!(location_score(Some(&austin), Some(&Location::labelled("austin", "tx"))), 1.0);
        assert_eq!(location_score(Some(&austin), Some(&dallas)), 0.7);
        assert_eq!(location_score(Some(&austin), Some(&denver)), DEFAULT_LOCATION_SCORE);

        // One side with a coordinate is still not enough for distance
        let boulder = Location::new(40.01, -105.27).with_city("Boulder", "CO");
        assert_eq!(location_score(Some(&austin), Some(&boulder)), DEFAULT_LOCATION_SCORE);
    }

    #[test]
    fn test_score_uses_injected_counter() {
        let mut counter = MockMutualConnectionCounter::new();
        counter
            .expect_mutual_connection_score()
            .returning(|_, _| 0.6);

        let scorer = FollowScorer::new(Arc::new(counter));
        let request = FollowRequest {
            requester_id: Uuid::new_v4(),
            interests: strings(&["music"]),
            ..Default::default()
        };
        let candidate = Candidate {
            id: Uuid::new_v4(),
            kind: CandidateKind::User,
            category: "music".to_string(),
            location: None,
            price: None,
            created_at: Utc::now(),
            starts_at: None,
            tags: Vec::new(),
            interests: strings(&["music"]),
            engagement: EngagementStats::default(),
        };

        let breakdown = scorer.score(&request, &candidate, Utc::now());
        assert_eq!(breakdown.mutual_connections, 0.6);
        // 0.25×1 + 0.30×0.6 + 0.20×0.5 + 0.15×0.3 + 0.10×1
        assert!((breakdown.final_score - 0.675).abs() < 1e-9);
    }

    #[traced_test]
    #[test]
    fn test_score_logs_every_signal() {
        let scorer = FollowScorer::default();
        let request = FollowRequest {
            requester_id: Uuid::new_v4(),
            interests: strings(&["music", "art"]),
            ..Default::default()
        };
        let candidate = Candidate {
            id: Uuid::new_v4(),
            kind: CandidateKind::User,
            category: "user".to_string(),
            location: None,
            price: None,
            created_at: Utc::now(),
            starts_at: None,
            tags: Vec::new(),
            interests: strings(&["music"]),
            engagement: EngagementStats::default(),
        };

        scorer.score(&request, &candidate, Utc::now());

        assert!(logs_contain("Follow score computed"));
        for field in ["similarity=", "mutual_connections=", "activity=", "location=", "interest_overlap=1"] {
            assert!(logs_contain(field), "missing {}", field);
        }
    }
}
