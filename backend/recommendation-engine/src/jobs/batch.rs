use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::models::{
    Candidate, FollowRequest, FollowSuggestion, Locality, NewsItem, NewsPreferences, ReadEvent,
    Recommendation, RequesterProfile, TrendingArticle,
};
use crate::services::{DiversityLayer, FollowSuggestionEngine, RecommendationEngine, TrendingRanker};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::{info, warn};

/// A single ranking request, tagged by pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "pipeline", rename_all = "snake_case")]
pub enum BatchRequest {
    Recommendations {
        profile: RequesterProfile,
        candidates: Vec<Candidate>,
        #[serde(default)]
        limit: Option<usize>,
        #[serde(default)]
        reference_time: Option<DateTime<Utc>>,
    },
    FollowSuggestions {
        request: FollowRequest,
        candidates: Vec<Candidate>,
        #[serde(default)]
        limit: Option<usize>,
        #[serde(default)]
        reference_time: Option<DateTime<Utc>>,
    },
    Trending {
        items: Vec<NewsItem>,
        #[serde(default)]
        viewer: Option<Locality>,
        #[serde(default)]
        preferences: Option<NewsPreferences>,
        /// Used to derive preferences when none are given
        #[serde(default)]
        history: Vec<ReadEvent>,
        #[serde(default)]
        limit: Option<usize>,
        #[serde(default)]
        reference_time: Option<DateTime<Utc>>,
    },
}

impl BatchRequest {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::from_json(&buf)
    }

    fn pipeline(&self) -> &'static str {
        match self {
            BatchRequest::Recommendations { .. } => "recommendations",
            BatchRequest::FollowSuggestions { .. } => "follow_suggestions",
            BatchRequest::Trending { .. } => "trending",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "pipeline", content = "results", rename_all = "snake_case")]
pub enum BatchResponse {
    Recommendations(Vec<Recommendation>),
    FollowSuggestions(Vec<FollowSuggestion>),
    Trending(Vec<TrendingArticle>),
}

impl BatchResponse {
    pub fn len(&self) -> usize {
        match self {
            BatchResponse::Recommendations(r) => r.len(),
            BatchResponse::FollowSuggestions(s) => s.len(),
            BatchResponse::Trending(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Holds configured engines and answers batch requests
pub struct BatchRunner {
    config: Config,
    recommendations: RecommendationEngine,
    follow_suggestions: FollowSuggestionEngine,
    trending: TrendingRanker,
}

impl BatchRunner {
    /// Baseline strategies configured from `config`
    pub fn new(config: Config) -> Self {
        let layer = DiversityLayer::new(config.max_per_category, config.max_per_type);
        Self {
            recommendations: RecommendationEngine::new()
                .with_diversity_layer(layer.clone())
                .with_ttl_hours(config.recommendation_ttl_hours),
            follow_suggestions: FollowSuggestionEngine::new().with_diversity_layer(layer),
            trending: TrendingRanker::default(),
            config,
        }
    }

    /// Replace the engines, e.g. with graph-backed strategies
    pub fn with_engines(
        mut self,
        recommendations: RecommendationEngine,
        follow_suggestions: FollowSuggestionEngine,
    ) -> Self {
        self.recommendations = recommendations;
        self.follow_suggestions = follow_suggestions;
        self
    }

    fn resolve_limit(&self, requested: Option<usize>) -> Result<usize> {
        let limit = requested.unwrap_or(self.config.default_limit);
        if limit == 0 {
            return Err(EngineError::InvalidInput("limit must be positive".to_string()));
        }
        if limit > self.config.max_limit {
            warn!(
                requested = limit,
                max_limit = self.config.max_limit,
                "Limit exceeds maximum, capping"
            );
        }
        Ok(limit.min(self.config.max_limit))
    }

    pub fn run(&self, request: BatchRequest) -> Result<BatchResponse> {
        let pipeline = request.pipeline();

        let response = match request {
            BatchRequest::Recommendations {
                profile,
                candidates,
                limit,
                reference_time,
            } => {
                let limit = self.resolve_limit(limit)?;
                let now = reference_time.unwrap_or_else(Utc::now);
                BatchResponse::Recommendations(
                    self.recommendations
                        .generate_recommendations_at(&profile, &candidates, limit, now),
                )
            }
            BatchRequest::FollowSuggestions {
                request,
                candidates,
                limit,
                reference_time,
            } => {
                let limit = self.resolve_limit(limit)?;
                let now = reference_time.unwrap_or_else(Utc::now);
                BatchResponse::FollowSuggestions(
                    self.follow_suggestions
                        .generate_follow_suggestions_at(&request, &candidates, limit, now),
                )
            }
            BatchRequest::Trending {
                items,
                viewer,
                preferences,
                history,
                limit,
                reference_time,
            } => {
                let limit = self.resolve_limit(limit)?;
                let now = reference_time.unwrap_or_else(Utc::now);
                let preferences = preferences.or_else(|| {
                    (!history.is_empty()).then(|| {
                        NewsPreferences::from_history(&history, self.config.preferred_news_top_n)
                    })
                });
                BatchResponse::Trending(self.trending.rank(
                    &items,
                    viewer.as_ref(),
                    preferences.as_ref(),
                    now,
                    limit,
                ))
            }
        };

        info!(
            pipeline = pipeline,
            result_count = response.len(),
            "Batch request completed"
        );

        Ok(response)
    }
}
