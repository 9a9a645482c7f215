/// Trending News Algorithm
///
/// trending = engagement × e^(-λ × age_hours) × locality_boost
///
/// News decays faster than general content (λ = 0.08 vs 0.05).
/// Personalisation multiplies the trending score by independent city,
/// source and category boosts.
use crate::models::{
    Algorithm, Locality, NewsItem, NewsPreferences, ReadEvent, TrendingArticle,
};
use crate::utils::exponential_decay;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Trending algorithm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingAlgorithm {
    /// Decay rate (lambda): higher = faster decay
    pub decay_rate: f64,

    /// Weight multipliers for engagement types
    pub like_weight: f64,
    pub comment_weight: f64,
    pub share_weight: f64,
    pub poll_vote_weight: f64,

    /// Locality boosts relative to the viewer
    pub same_city_boost: f64,
    pub same_country_boost: f64,

    /// Personalisation boosts
    pub preferred_city_boost: f64,
    pub preferred_source_boost: f64,
    pub preferred_category_boost: f64,
}

impl Default for TrendingAlgorithm {
    fn default() -> Self {
        Self {
            decay_rate: 0.08,
            like_weight: 1.0,
            comment_weight: 2.0,
            share_weight: 1.5,
            poll_vote_weight: 1.0,
            same_city_boost: 1.2,
            same_country_boost: 1.1,
            preferred_city_boost: 1.3,
            preferred_source_boost: 1.2,
            preferred_category_boost: 1.15,
        }
    }
}

fn matches_label(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.trim().is_empty() && a.trim().eq_ignore_ascii_case(b.trim()),
        _ => false,
    }
}

fn contains_label(list: &[String], value: &str) -> bool {
    !value.trim().is_empty() && list.iter().any(|v| v.trim().eq_ignore_ascii_case(value.trim()))
}

impl TrendingAlgorithm {
    /// Calculate decay factor for a given age in hours
    ///
    /// Examples (λ = 0.08):
    /// - age = 2h  → e^(-0.16) = 0.852
    /// - age = 24h → e^(-1.92) = 0.147
    pub fn decay_factor(&self, age_hours: f64) -> f64 {
        exponential_decay(self.decay_rate, age_hours)
    }

    /// Time for the score to halve: ln(2) / λ
    pub fn half_life_hours(&self) -> f64 {
        2.0_f64.ln() / self.decay_rate
    }

    /// likes + 2·comments + 1.5·shares + poll votes (with default weights)
    pub fn engagement_score(&self, item: &NewsItem) -> f64 {
        self.like_weight * item.likes as f64
            + self.comment_weight * item.comments as f64
            + self.share_weight * item.shares as f64
            + self.poll_vote_weight * item.poll_votes as f64
    }

    /// Same city ×1.2, same country ×1.1, otherwise ×1.0
    pub fn locality_boost(&self, item: &NewsItem, viewer: Option<&Locality>) -> f64 {
        let Some(viewer) = viewer else {
            return 1.0;
        };

        if matches_label(item.city.as_deref(), viewer.city.as_deref()) {
            self.same_city_boost
        } else if matches_label(item.country.as_deref(), viewer.country.as_deref()) {
            self.same_country_boost
        } else {
            1.0
        }
    }

    pub fn compute_trending_score(
        &self,
        item: &NewsItem,
        viewer: Option<&Locality>,
        reference_time: DateTime<Utc>,
    ) -> f64 {
        let age_hours = (reference_time - item.published_at).num_seconds() as f64 / 3600.0;
        self.engagement_score(item) * self.decay_factor(age_hours) * self.locality_boost(item, viewer)
    }

    /// Apply each matching preference boost multiplicatively
    pub fn compute_personalized_score(
        &self,
        trending_score: f64,
        preferences: &NewsPreferences,
        item: &NewsItem,
    ) -> f64 {
        let mut score = trending_score;

        if let Some(city) = item.city.as_deref() {
            if contains_label(&preferences.preferred_cities, city) {
                score *= self.preferred_city_boost;
            }
        }
        if contains_label(&preferences.preferred_sources, &item.source) {
            score *= self.preferred_source_boost;
        }
        if contains_label(&preferences.preferred_categories, &item.category) {
            score *= self.preferred_category_boost;
        }

        score
    }

    /// Validate algorithm parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.decay_rate <= 0.0 || self.decay_rate > 1.0 {
            return Err(format!(
                "Decay rate must be in (0, 1], got {}",
                self.decay_rate
            ));
        }

        if self.like_weight < 0.0
            || self.comment_weight < 0.0
            || self.share_weight < 0.0
            || self.poll_vote_weight < 0.0
        {
            return Err("All engagement weights must be non-negative".to_string());
        }

        let boosts = [
            self.same_city_boost,
            self.same_country_boost,
            self.preferred_city_boost,
            self.preferred_source_boost,
            self.preferred_category_boost,
        ];
        if boosts.iter().any(|b| *b < 1.0) {
            return Err("Boosts must be at least 1.0".to_string());
        }

        if self.same_city_boost < self.same_country_boost {
            return Err("Same-city boost must not be below same-country boost".to_string());
        }

        Ok(())
    }
}

impl NewsPreferences {
    /// Most frequent cities, sources and categories in the reading history
    ///
    /// Ties keep the order of first appearance.
    pub fn from_history(history: &[ReadEvent], top_n: usize) -> Self {
        Self {
            preferred_cities: top_labels(history.iter().filter_map(|e| e.city.as_deref()), top_n),
            preferred_sources: top_labels(history.iter().map(|e| e.source.as_str()), top_n),
            preferred_categories: top_labels(history.iter().map(|e| e.category.as_str()), top_n),
        }
    }
}

fn top_labels<'a>(labels: impl Iterator<Item = &'a str>, top_n: usize) -> Vec<String> {
    // lowercased label → (count, first position, first spelling)
    let mut counts: HashMap<String, (usize, usize, String)> = HashMap::new();
    for (position, label) in labels.enumerate() {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        counts
            .entry(label.to_lowercase())
            .or_insert_with(|| (0, position, label.to_string()))
            .0 += 1;
    }

    let mut ranked: Vec<(usize, usize, String)> = counts.into_values().collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    ranked.into_iter().take(top_n).map(|(_, _, label)| label).collect()
}

/// Ranks news items by (optionally personalised) trending score
#[derive(Debug, Clone, Default)]
pub struct TrendingRanker {
    algorithm: TrendingAlgorithm,
}

impl TrendingRanker {
    pub fn new(algorithm: TrendingAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> &TrendingAlgorithm {
        &self.algorithm
    }

    pub fn rank(
        &self,
        items: &[NewsItem],
        viewer: Option<&Locality>,
        preferences: Option<&NewsPreferences>,
        reference_time: DateTime<Utc>,
        limit: usize,
    ) -> Vec<TrendingArticle> {
        let preferences = preferences.filter(|p| !p.is_empty());

        let mut articles: Vec<TrendingArticle> = items
            .iter()
            .map(|item| {
                let trending_score =
                    self.algorithm
                        .compute_trending_score(item, viewer, reference_time);
                let personalized_score = preferences.map(|prefs| {
                    self.algorithm
                        .compute_personalized_score(trending_score, prefs, item)
                });

                debug!(
                    news_id = %item.id,
                    trending_score = trending_score,
                    personalized_score = ?personalized_score,
                    "Trending score computed"
                );

                TrendingArticle {
                    news_id: item.id,
                    trending_score,
                    personalized_score,
                    algorithm: Algorithm::Trending,
                    created_at: reference_time,
                }
            })
            .collect();

        // Stable: equal scores keep input order
        articles.sort_by(|a, b| {
            b.effective_score()
                .partial_cmp(&a.effective_score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        articles.truncate(limit);

        info!(
            input_count = items.len(),
            output_count = articles.len(),
            personalized = preferences.is_some(),
            "Trending ranking completed"
        );

        articles
    }
}
