// Similarity and distance helpers shared by every scorer

use std::collections::{HashMap, HashSet};

/// Mean Earth radius used for great-circle distance
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Clamp a score to [0, 1]. NaN collapses to 0.
pub fn clamp_unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Exponential time decay: e^(-rate × age_hours)
///
/// Negative ages (timestamps slightly in the future) count as fresh.
pub fn exponential_decay(rate: f64, age_hours: f64) -> f64 {
    (-rate * age_hours.max(0.0)).exp()
}

/// Great-circle distance between two coordinates in kilometres
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Case-insensitive intersection keeping the casing and order of `a`
pub fn common_interests(a: &[String], b: &[String]) -> Vec<String> {
    let other: HashSet<String> = b.iter().map(|s| s.to_lowercase()).collect();
    let mut seen: HashSet<String> = HashSet::new();

    a.iter()
        .filter(|interest| {
            let key = interest.to_lowercase();
            other.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect()
}

/// Cosine similarity over the union of feature keys
///
/// Missing keys count as 0. A zero-magnitude vector yields 0.
pub fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(key, va)| b.get(key).map(|vb| va * vb))
        .sum();
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    clamp_unit(dot / (norm_a * norm_b))
}
