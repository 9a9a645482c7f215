/// Social Graph Capabilities
///
/// Scorers depend on the social graph only through these traits so the core
/// never talks to the graph store directly.
///
/// # Baseline implementations
/// - `NoSimilarUsers`: similar-user discovery is not wired up, collaborative
///   scoring falls back to its neutral default
/// - `FollowerCountEstimate`: mutual connections estimated as 10% of the
///   smaller follower count
/// - `ConstantDiversity`: fixed 0.8 diversity score
///
/// # Graph-backed implementations
/// - `SocialGraph`: in-memory follow edges and known profiles
/// - `CategoryNoveltyDiversity`: rewards categories the requester has not
///   already weighted heavily
use crate::models::{same_category, Candidate, FollowRequest, RequesterProfile};
use crate::utils::clamp_unit;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Mutual connection count that maps to a score of 1.0
pub const MUTUAL_CONNECTIONS_SATURATION: f64 = 50.0;

/// Finds users whose preferences resemble the requester's
#[cfg_attr(test, mockall::automock)]
pub trait SimilarUserFinder {
    fn find_similar_users(&self, profile: &RequesterProfile) -> Vec<RequesterProfile>;
}

/// Scores how connected a requester already is to a candidate user
#[cfg_attr(test, mockall::automock)]
pub trait MutualConnectionCounter {
    /// Returns a score in [0, 1]
    fn mutual_connection_score(&self, request: &FollowRequest, candidate: &Candidate) -> f64;
}

/// Measures how much a candidate would broaden the requester's feed
#[cfg_attr(test, mockall::automock)]
pub trait DiversityStrategy {
    /// Returns a score in [0, 1]
    fn diversity_score(&self, profile: &RequesterProfile, candidate: &Candidate) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoSimilarUsers;

impl SimilarUserFinder for NoSimilarUsers {
    fn find_similar_users(&self, _profile: &RequesterProfile) -> Vec<RequesterProfile> {
        Vec::new()
    }
}

/// Placeholder estimate: `min(requester followers, candidate followers) × 0.10`
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowerCountEstimate;

impl MutualConnectionCounter for FollowerCountEstimate {
    fn mutual_connection_score(&self, request: &FollowRequest, candidate: &Candidate) -> f64 {
        let smaller = request
            .follower_count
            .min(candidate.engagement.followers_count);
        clamp_unit(smaller as f64 * 0.10)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConstantDiversity(pub f64);

impl Default for ConstantDiversity {
    fn default() -> Self {
        Self(0.8)
    }
}

impl DiversityStrategy for ConstantDiversity {
    fn diversity_score(&self, _profile: &RequesterProfile, _candidate: &Candidate) -> f64 {
        clamp_unit(self.0)
    }
}

/// 1 − 0.5 × (share of the requester's preference weight in the candidate category)
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryNoveltyDiversity;

impl DiversityStrategy for CategoryNoveltyDiversity {
    fn diversity_score(&self, profile: &RequesterProfile, candidate: &Candidate) -> f64 {
        let total: f64 = profile.preferences.iter().map(|p| p.weight.max(0.0)).sum();
        if total <= 0.0 {
            return 1.0;
        }

        let in_category: f64 = profile
            .preferences
            .iter()
            .filter(|p| same_category(&p.category, &candidate.category))
            .map(|p| p.weight.max(0.0))
            .sum();

        clamp_unit(1.0 - 0.5 * (in_category / total))
    }
}

/// In-memory follow graph with the profiles of known users
#[derive(Debug, Clone)]
pub struct SocialGraph {
    following: HashMap<Uuid, HashSet<Uuid>>,
    profiles: Vec<RequesterProfile>,
    max_similar_users: usize,
}

impl Default for SocialGraph {
    fn default() -> Self {
        Self::new(20)
    }
}

impl SocialGraph {
    pub fn new(max_similar_users: usize) -> Self {
        Self {
            following: HashMap::new(),
            profiles: Vec::new(),
            max_similar_users,
        }
    }

    pub fn add_follow(&mut self, follower: Uuid, followee: Uuid) {
        self.following.entry(follower).or_default().insert(followee);
    }

    pub fn add_profile(&mut self, profile: RequesterProfile) {
        self.profiles.retain(|p| p.user_id != profile.user_id);
        self.profiles.push(profile);
    }

    pub fn follows(&self, follower: &Uuid, followee: &Uuid) -> bool {
        self.following
            .get(follower)
            .map(|set| set.contains(followee))
            .unwrap_or(false)
    }

    /// Users the requester follows who also follow the candidate
    pub fn mutual_connections(&self, requester: &Uuid, candidate: &Uuid) -> usize {
        self.following
            .get(requester)
            .map(|followees| {
                followees
                    .iter()
                    .filter(|id| *id != candidate && self.follows(id, candidate))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Sum over shared categories of the smaller preference weight
    fn preference_overlap(a: &RequesterProfile, b: &RequesterProfile) -> f64 {
        a.preferences
            .iter()
            .filter_map(|pa| b.preference_for(&pa.category).map(|pb| pa.weight.min(pb.weight)))
            .sum()
    }
}

impl SimilarUserFinder for SocialGraph {
    fn find_similar_users(&self, profile: &RequesterProfile) -> Vec<RequesterProfile> {
        let mut scored: Vec<(f64, &RequesterProfile)> = self
            .profiles
            .iter()
            .filter(|other| other.user_id != profile.user_id)
            .map(|other| (Self::preference_overlap(profile, other), other))
            .filter(|(overlap, _)| *overlap > 0.0)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(self.max_similar_users)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl MutualConnectionCounter for SocialGraph {
    fn mutual_connection_score(&self, request: &FollowRequest, candidate: &Candidate) -> f64 {
        let count = self.mutual_connections(&request.requester_id, &candidate.id);
        clamp_unit(count as f64 / MUTUAL_CONNECTIONS_SATURATION)
    }
}
