use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Civic labels with an optional coordinate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Default::default()
        }
    }

    /// City and state only, no coordinate
    pub fn labelled(city: &str, state: &str) -> Self {
        Self::default().with_city(city, state)
    }

    /// (latitude, longitude) when both are known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn with_city(mut self, city: &str, state: &str) -> Self {
        self.city = Some(city.to_string());
        self.state = Some(state.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    Post,
    Event,
    User,
}

impl CandidateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Post => "post",
            CandidateKind::Event => "event",
            CandidateKind::User => "user",
        }
    }
}

/// Counters used by the follow-suggestion activity score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngagementStats {
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub posts_count: u64,
    #[serde(default)]
    pub events_created: u64,
    #[serde(default)]
    pub last_active_at: Option<DateTime<Utc>>,
}

/// A rankable item: a post, an event or another user's profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub kind: CandidateKind,
    pub category: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
    /// Event start time (events only)
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub engagement: EngagementStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preference {
    pub category: String,
    pub weight: f64,
    #[serde(default)]
    pub source: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub action: String,
    pub content_type: String,
    pub content_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// The user recommendations are generated for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequesterProfile {
    pub user_id: Uuid,
    #[serde(default)]
    pub preferences: Vec<Preference>,
    #[serde(default)]
    pub behavior: Vec<BehaviorEvent>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl RequesterProfile {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            preferences: Vec::new(),
            behavior: Vec::new(),
            location: None,
        }
    }

    pub fn preference_for(&self, category: &str) -> Option<&Preference> {
        self.preferences
            .iter()
            .find(|p| same_category(&p.category, category))
    }
}

/// Category labels compare trimmed and case-insensitively
pub fn same_category(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Hybrid,
    FollowHybrid,
    Trending,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Hybrid => "hybrid",
            Algorithm::FollowHybrid => "follow_hybrid",
            Algorithm::Trending => "trending",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentScoreBreakdown {
    pub collaborative: f64,
    pub content_based: f64,
    pub location: f64,
    pub freshness: f64,
    pub diversity: f64,
    pub final_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowScoreBreakdown {
    pub similarity: f64,
    pub mutual_connections: f64,
    pub activity: f64,
    pub location: f64,
    pub interest_overlap: f64,
    pub final_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub content_id: Uuid,
    pub content_type: CandidateKind,
    pub score: f64,
    pub reason: String,
    pub algorithm: Algorithm,
    pub breakdown: ContentScoreBreakdown,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Input for the follow-suggestion pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowRequest {
    pub requester_id: Uuid,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub follower_count: u64,
    /// Users already followed (or otherwise hidden)
    #[serde(default)]
    pub excluded_ids: HashSet<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowSuggestion {
    pub user_id: Uuid,
    pub score: f64,
    pub reason: String,
    pub algorithm: Algorithm,
    pub breakdown: FollowScoreBreakdown,
    pub created_at: DateTime<Utc>,
}

// ============================================
// News / trending
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: Uuid,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub poll_votes: u64,
    pub published_at: DateTime<Utc>,
}

/// Where the viewer of a trending list is located
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Locality {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsPreferences {
    #[serde(default)]
    pub preferred_cities: Vec<String>,
    #[serde(default)]
    pub preferred_sources: Vec<String>,
    #[serde(default)]
    pub preferred_categories: Vec<String>,
}

impl NewsPreferences {
    pub fn is_empty(&self) -> bool {
        self.preferred_cities.is_empty()
            && self.preferred_sources.is_empty()
            && self.preferred_categories.is_empty()
    }
}

/// One article read by the viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadEvent {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
    pub read_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingArticle {
    pub news_id: Uuid,
    pub trending_score: f64,
    pub personalized_score: Option<f64>,
    pub algorithm: Algorithm,
    pub created_at: DateTime<Utc>,
}

impl TrendingArticle {
    /// Score used for ordering: personalised when available
    pub fn effective_score(&self) -> f64 {
        self.personalized_score.unwrap_or(self.trending_score)
    }
}
