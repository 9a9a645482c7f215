// ============================================
// Content Feature Extraction
// ============================================
//
// Sparse feature vectors for the content-based fallback path:
//   Candidate → category / type / tag / price bucket / time-to-event flags
//   Requester → behaviour counts (normalised by max) + preference weights
//
// Keys are lower-cased so both sides meet in the same feature space.

use crate::models::{Candidate, RequesterProfile};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

pub type FeatureVector = HashMap<String, f64>;

/// Upper bound (exclusive) of the "low" price bucket
const LOW_PRICE_LIMIT: f64 = 20.0;
/// Upper bound (exclusive) of the "medium" price bucket
const MEDIUM_PRICE_LIMIT: f64 = 50.0;

fn key(prefix: &str, value: &str) -> String {
    format!("{}:{}", prefix, value.trim().to_lowercase())
}

pub fn price_bucket(price: f64) -> &'static str {
    if price <= 0.0 {
        "free"
    } else if price < LOW_PRICE_LIMIT {
        "low"
    } else if price < MEDIUM_PRICE_LIMIT {
        "medium"
    } else {
        "high"
    }
}

/// Bucket for an upcoming event; past events get no flag
pub fn time_to_event_bucket(starts_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<&'static str> {
    let until = starts_at - now;
    if until < Duration::zero() {
        None
    } else if until <= Duration::hours(24) {
        Some("today")
    } else if until <= Duration::days(7) {
        Some("this_week")
    } else {
        Some("later")
    }
}

pub fn candidate_features(candidate: &Candidate, now: DateTime<Utc>) -> FeatureVector {
    let mut features = FeatureVector::new();

    features.insert(key("category", &candidate.category), 1.0);
    features.insert(key("type", candidate.kind.as_str()), 1.0);

    for tag in &candidate.tags {
        features.insert(key("tag", tag), 1.0);
    }

    if let Some(price) = candidate.price {
        features.insert(key("price", price_bucket(price)), 1.0);
    }

    if let Some(bucket) = candidate
        .starts_at
        .and_then(|starts_at| time_to_event_bucket(starts_at, now))
    {
        features.insert(key("starts", bucket), 1.0);
    }

    features
}

/// Requester interest vector
///
/// Behaviour counts per content type are divided by the largest count so the
/// busiest type maps to 1.0. Preferences contribute their weight both as a
/// category and as a tag.
pub fn requester_features(profile: &RequesterProfile) -> FeatureVector {
    let mut counts: HashMap<String, f64> = HashMap::new();
    for event in &profile.behavior {
        *counts.entry(key("type", &event.content_type)).or_insert(0.0) += 1.0;
    }

    let max_count = counts.values().cloned().fold(0.0_f64, f64::max);
    let mut features: FeatureVector = if max_count > 0.0 {
        counts
            .into_iter()
            .map(|(k, count)| (k, count / max_count))
            .collect()
    } else {
        FeatureVector::new()
    };

    for preference in &profile.preferences {
        let weight = preference.weight.clamp(0.0, 1.0);
        if weight > 0.0 {
            features.insert(key("category", &preference.category), weight);
            features.insert(key("tag", &preference.category), weight);
        }
    }

    features
}
