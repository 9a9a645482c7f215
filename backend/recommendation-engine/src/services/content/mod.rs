// ============================================
// Hybrid Content Scorer
// ============================================
//
// Scores posts and events for one requester. Five independent signals,
// each clamped to [0, 1], combined linearly:
//
//   collaborative 0.30 | content-based 0.25 | location 0.20
//   freshness     0.15 | diversity     0.10
//
// Missing data never fails a score: the affected signal falls back to
// NEUTRAL_SCORE.

pub mod features;

use self::features::{candidate_features, requester_features, FeatureVector};
use crate::models::{Candidate, ContentScoreBreakdown, Location, RequesterProfile};
use crate::services::graph::{ConstantDiversity, DiversityStrategy};
use crate::utils::{clamp_unit, cosine_similarity, exponential_decay, haversine_distance_km};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Default when a signal has nothing to go on
pub const NEUTRAL_SCORE: f64 = 0.5;
/// Freshness decay per hour since creation
pub const FRESHNESS_DECAY_RATE: f64 = 0.05;
/// Old content never drops below this freshness
pub const FRESHNESS_FLOOR: f64 = 0.1;
/// Location score reaches 0 at this distance
pub const LOCATION_FALLOFF_KM: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentWeights {
    pub collaborative: f64,
    pub content_based: f64,
    pub location: f64,
    pub freshness: f64,
    pub diversity: f64,
}

impl ContentWeights {
    pub const DEFAULT: ContentWeights = ContentWeights {
        collaborative: 0.30,
        content_based: 0.25,
        location: 0.20,
        freshness: 0.15,
        diversity: 0.10,
    };

    pub fn total(&self) -> f64 {
        self.collaborative + self.content_based + self.location + self.freshness + self.diversity
    }

    pub fn combine(&self, b: &ContentScoreBreakdown) -> f64 {
        self.collaborative * b.collaborative
            + self.content_based * b.content_based
            + self.location * b.location
            + self.freshness * b.freshness
            + self.diversity * b.diversity
    }
}

/// Per-request data computed once and shared by every candidate
pub struct ContentContext<'a> {
    pub profile: &'a RequesterProfile,
    pub similar_users: Vec<RequesterProfile>,
    pub user_vector: FeatureVector,
}

impl<'a> ContentContext<'a> {
    pub fn new(profile: &'a RequesterProfile, similar_users: Vec<RequesterProfile>) -> Self {
        Self {
            profile,
            similar_users,
            user_vector: requester_features(profile),
        }
    }
}

pub struct ContentScorer {
    diversity: Arc<dyn DiversityStrategy + Send + Sync>,
}

impl Default for ContentScorer {
    fn default() -> Self {
        Self::new(Arc::new(ConstantDiversity::default()))
    }
}

impl ContentScorer {
    pub fn new(diversity: Arc<dyn DiversityStrategy + Send + Sync>) -> Self {
        Self { diversity }
    }

    /// Full breakdown for one candidate
    pub fn score(
        &self,
        ctx: &ContentContext<'_>,
        candidate: &Candidate,
        now: DateTime<Utc>,
    ) -> ContentScoreBreakdown {
        let mut breakdown = ContentScoreBreakdown {
            collaborative: collaborative_score(&ctx.similar_users, &candidate.category),
            content_based: content_based_score(ctx.profile, &ctx.user_vector, candidate, now),
            location: location_score(ctx.profile.location.as_ref(), candidate.location.as_ref()),
            freshness: freshness_score(candidate.created_at, now),
            diversity: clamp_unit(self.diversity.diversity_score(ctx.profile, candidate)),
            final_score: 0.0,
        };
        breakdown.final_score = ContentWeights::DEFAULT.combine(&breakdown);

        debug!(
            content_id = %candidate.id,
            collaborative = breakdown.collaborative,
            content_based = breakdown.content_based,
            location = breakdown.location,
            freshness = breakdown.freshness,
            diversity = breakdown.diversity,
            score = breakdown.final_score,
            "Content score computed"
        );

        breakdown
    }
}

/// Average weight similar users give the category
///
/// Users without a preference for the category contribute 0.
pub fn collaborative_score(similar_users: &[RequesterProfile], category: &str) -> f64 {
    if similar_users.is_empty() {
        return NEUTRAL_SCORE;
    }

    let total: f64 = similar_users
        .iter()
        .filter_map(|user| user.preference_for(category))
        .map(|p| clamp_unit(p.weight))
        .sum();

    clamp_unit(total / similar_users.len() as f64)
}

/// Direct preference lookup, else cosine similarity of feature vectors
pub fn content_based_score(
    profile: &RequesterProfile,
    user_vector: &FeatureVector,
    candidate: &Candidate,
    now: DateTime<Utc>,
) -> f64 {
    if let Some(preference) = profile.preference_for(&candidate.category) {
        return clamp_unit(preference.weight);
    }

    if user_vector.is_empty() {
        return NEUTRAL_SCORE;
    }

    cosine_similarity(&candidate_features(candidate, now), user_vector)
}

/// Linear falloff to 0 at 50 km; neutral when either side has no coordinate
pub fn location_score(requester: Option<&Location>, candidate: Option<&Location>) -> f64 {
    let a = requester.and_then(Location::coordinates);
    let b = candidate.and_then(Location::coordinates);

    match (a, b) {
        (Some((lat1, lon1)), Some((lat2, lon2))) => {
            let distance = haversine_distance_km(lat1, lon1, lat2, lon2);
            clamp_unit(1.0 - distance / LOCATION_FALLOFF_KM)
        }
        _ => NEUTRAL_SCORE,
    }
}

/// e^(-0.05 × hours since creation), floored at 0.1
pub fn freshness_score(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_hours = (now - created_at).num_seconds() as f64 / 3600.0;
    exponential_decay(FRESHNESS_DECAY_RATE, age_hours).max(FRESHNESS_FLOOR)
}
