/// Ranking Pipelines
///
/// Both engines follow the same flow:
/// 1. Score every candidate (full breakdown)
/// 2. Stable sort by final score, descending
/// 3. Diversity selection with backfill, truncated to `limit`
/// 4. Attach reason text and emit output records
///
/// Engines are plain values holding their injected strategies. A ranking
/// call reads nothing but its arguments, so one engine can serve many
/// requesters concurrently.
use crate::models::{
    Algorithm, Candidate, ContentScoreBreakdown, FollowRequest, FollowScoreBreakdown,
    FollowSuggestion, Recommendation, RequesterProfile,
};
use crate::services::content::{ContentContext, ContentScorer};
use crate::services::diversity::{Diversifiable, DiversityLayer};
use crate::services::follow::FollowScorer;
use crate::services::graph::{
    DiversityStrategy, MutualConnectionCounter, NoSimilarUsers, SimilarUserFinder,
};
use crate::services::reason::{content_reason, follow_reason};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info};

/// Content recommendations stay valid for this long
pub const DEFAULT_RECOMMENDATION_TTL_HOURS: i64 = 24;

fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

struct ScoredContent<'a> {
    candidate: &'a Candidate,
    breakdown: ContentScoreBreakdown,
}

impl Diversifiable for ScoredContent<'_> {
    fn diversity_category(&self) -> &str {
        &self.candidate.category
    }

    fn diversity_type(&self) -> &str {
        self.candidate.kind.as_str()
    }
}

struct ScoredUser<'a> {
    candidate: &'a Candidate,
    breakdown: FollowScoreBreakdown,
}

impl Diversifiable for ScoredUser<'_> {
    /// Users are bucketed by their leading interest
    fn diversity_category(&self) -> &str {
        self.candidate
            .interests
            .first()
            .map(String::as_str)
            .unwrap_or(self.candidate.category.as_str())
    }

    fn diversity_type(&self) -> &str {
        self.candidate.kind.as_str()
    }
}

/// Hybrid recommendations for posts and events
pub struct RecommendationEngine {
    scorer: ContentScorer,
    similar_users: Arc<dyn SimilarUserFinder + Send + Sync>,
    diversity_layer: DiversityLayer,
    ttl: Duration,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationEngine {
    /// Baseline strategies: no similar users, constant diversity
    pub fn new() -> Self {
        Self {
            scorer: ContentScorer::default(),
            similar_users: Arc::new(NoSimilarUsers),
            diversity_layer: DiversityLayer::default(),
            ttl: Duration::hours(DEFAULT_RECOMMENDATION_TTL_HOURS),
        }
    }

    /// Create with custom similar-user and diversity strategies
    pub fn with_strategies(
        similar_users: Arc<dyn SimilarUserFinder + Send + Sync>,
        diversity: Arc<dyn DiversityStrategy + Send + Sync>,
    ) -> Self {
        Self {
            scorer: ContentScorer::new(diversity),
            similar_users,
            ..Self::new()
        }
    }

    pub fn with_diversity_layer(mut self, layer: DiversityLayer) -> Self {
        self.diversity_layer = layer;
        self
    }

    pub fn with_ttl_hours(mut self, hours: i64) -> Self {
        self.ttl = Duration::hours(hours);
        self
    }

    pub fn generate_recommendations(
        &self,
        profile: &RequesterProfile,
        candidates: &[Candidate],
        limit: usize,
    ) -> Vec<Recommendation> {
        self.generate_recommendations_at(profile, candidates, limit, Utc::now())
    }

    pub fn generate_recommendations_at(
        &self,
        profile: &RequesterProfile,
        candidates: &[Candidate],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        if candidates.is_empty() || limit == 0 {
            return Vec::new();
        }

        let similar_users = self.similar_users.find_similar_users(profile);
        debug!(
            user_id = %profile.user_id,
            similar_users = similar_users.len(),
            "Similar users resolved"
        );
        let ctx = ContentContext::new(profile, similar_users);

        let mut scored: Vec<ScoredContent<'_>> = candidates
            .iter()
            .map(|candidate| ScoredContent {
                candidate,
                breakdown: self.scorer.score(&ctx, candidate, now),
            })
            .collect();

        scored.sort_by(|a, b| by_score_desc(a.breakdown.final_score, b.breakdown.final_score));

        let selected = self.diversity_layer.select(scored, limit);

        let recommendations: Vec<Recommendation> = selected
            .into_iter()
            .map(|s| Recommendation {
                content_id: s.candidate.id,
                content_type: s.candidate.kind,
                score: s.breakdown.final_score,
                reason: content_reason(&s.breakdown, &s.candidate.category),
                algorithm: Algorithm::Hybrid,
                breakdown: s.breakdown,
                created_at: now,
                expires_at: Some(now + self.ttl),
            })
            .collect();

        info!(
            user_id = %profile.user_id,
            input_count = candidates.len(),
            output_count = recommendations.len(),
            top_score = recommendations.first().map(|r| r.score),
            "Content recommendations generated"
        );

        recommendations
    }
}

/// Follow suggestions for other users
pub struct FollowSuggestionEngine {
    scorer: FollowScorer,
    diversity_layer: DiversityLayer,
}

impl Default for FollowSuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowSuggestionEngine {
    /// Baseline mutual-connection estimate from follower counts
    pub fn new() -> Self {
        Self {
            scorer: FollowScorer::default(),
            diversity_layer: DiversityLayer::default(),
        }
    }

    pub fn with_mutual_connections(
        mutual_connections: Arc<dyn MutualConnectionCounter + Send + Sync>,
    ) -> Self {
        Self {
            scorer: FollowScorer::new(mutual_connections),
            ..Self::new()
        }
    }

    pub fn with_diversity_layer(mut self, layer: DiversityLayer) -> Self {
        self.diversity_layer = layer;
        self
    }

    pub fn generate_follow_suggestions(
        &self,
        request: &FollowRequest,
        candidates: &[Candidate],
        limit: usize,
    ) -> Vec<FollowSuggestion> {
        self.generate_follow_suggestions_at(request, candidates, limit, Utc::now())
    }

    pub fn generate_follow_suggestions_at(
        &self,
        request: &FollowRequest,
        candidates: &[Candidate],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<FollowSuggestion> {
        if limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<ScoredUser<'_>> = candidates
            .iter()
            .filter(|c| c.id != request.requester_id && !request.excluded_ids.contains(&c.id))
            .map(|candidate| ScoredUser {
                candidate,
                breakdown: self.scorer.score(request, candidate, now),
            })
            .collect();

        let eligible = scored.len();
        scored.sort_by(|a, b| by_score_desc(a.breakdown.final_score, b.breakdown.final_score));

        let suggestions: Vec<FollowSuggestion> = self
            .diversity_layer
            .select(scored, limit)
            .into_iter()
            .map(|s| FollowSuggestion {
                user_id: s.candidate.id,
                score: s.breakdown.final_score,
                reason: follow_reason(&s.breakdown),
                algorithm: Algorithm::FollowHybrid,
                breakdown: s.breakdown,
                created_at: now,
            })
            .collect();

        info!(
            user_id = %request.requester_id,
            input_count = candidates.len(),
            excluded_count = candidates.len() - eligible,
            output_count = suggestions.len(),
            "Follow suggestions generated"
        );

        suggestions
    }
}
