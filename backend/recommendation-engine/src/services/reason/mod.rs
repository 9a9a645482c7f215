// Rule-based explanation strings for ranked results

use crate::models::{ContentScoreBreakdown, FollowScoreBreakdown};
use crate::services::graph::MUTUAL_CONNECTIONS_SATURATION;

pub const FALLBACK_REASON: &str = "Recommended for you";

fn join_or_fallback(reasons: Vec<String>) -> String {
    if reasons.is_empty() {
        FALLBACK_REASON.to_string()
    } else {
        reasons.join(", ")
    }
}

pub fn content_reason(breakdown: &ContentScoreBreakdown, category: &str) -> String {
    let mut reasons = Vec::new();

    if breakdown.content_based > 0.7 {
        reasons.push(format!("Based on your interest in {}", category));
    }
    if breakdown.location > 0.7 {
        reasons.push("Near you".to_string());
    }
    if breakdown.freshness > 0.8 {
        reasons.push("Recently added".to_string());
    }
    if breakdown.collaborative > 0.7 {
        reasons.push("Popular with similar users".to_string());
    }

    join_or_fallback(reasons)
}

pub fn follow_reason(breakdown: &FollowScoreBreakdown) -> String {
    let mut reasons = Vec::new();

    if breakdown.similarity > 0.7 {
        reasons.push("Similar interests".to_string());
    }

    if breakdown.location > 0.8 {
        reasons.push("In your city".to_string());
    } else if breakdown.location > 0.6 {
        reasons.push("Nearby".to_string());
    }

    if breakdown.mutual_connections > 0.5 {
        let count = (breakdown.mutual_connections * MUTUAL_CONNECTIONS_SATURATION).floor() as u64;
        reasons.push(format!("{} mutual connections", count));
    }

    if breakdown.activity > 0.7 {
        reasons.push("Very active".to_string());
    } else if breakdown.activity > 0.5 {
        reasons.push("Active user".to_string());
    }

    if breakdown.interest_overlap > 0.6 {
        reasons.push("Shared interests".to_string());
    }

    join_or_fallback(reasons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_reason_fallback() {
        let breakdown = ContentScoreBreakdown {
            collaborative: 0.5,
            content_based: 0.5,
            location: 0.5,
            freshness: 0.5,
            diversity: 0.8,
            final_score: 0.53,
        };
        assert_eq!(content_reason(&breakdown, "music"), FALLBACK_REASON);
    }

    #[test]
    fn test_content_reason_phrases_in_order() {
        let breakdown = ContentScoreBreakdown {
            collaborative: 0.9,
            content_based: 0.9,
            location: 0.95,
            freshness: 0.99,
            diversity: 0.8,
            final_score: 0.9,
        };
        assert_eq!(
            content_reason(&breakdown, "music"),
            "Based on your interest in music, Near you, Recently added, Popular with similar users"
        );
    }

    #[test]
    fn test_follow_reason() {
        let breakdown = FollowScoreBreakdown {
            similarity: 0.8,
            mutual_connections: 0.6,
            activity: 0.9,
            location: 0.7,
            interest_overlap: 0.2,
            final_score: 0.7,
        };
        assert_eq!(
            follow_reason(&breakdown),
            "Similar interests, Nearby, 30 mutual connections, Very active"
        );
    }

    #[test]
    fn test_follow_reason_city_and_active() {
        let breakdown = FollowScoreBreakdown {
            similarity: 0.0,
            mutual_connections: 0.0,
            activity: 0.6,
            location: 1.0,
            interest_overlap: 1.0,
            final_score: 0.5,
        };
        assert_eq!(
            follow_reason(&breakdown),
            "In your city, Active user, Shared interests"
        );

        assert_eq!(follow_reason(&FollowScoreBreakdown::default()), FALLBACK_REASON);
    }
}
