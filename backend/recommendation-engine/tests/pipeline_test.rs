use chrono::{DateTime, Duration, TimeZone, Utc};
use recommendation_engine::models::{
    Candidate, CandidateKind, EngagementStats, FollowRequest, Locality, Location, NewsItem,
    Preference, RequesterProfile,
};
use recommendation_engine::services::graph::{CategoryNoveltyDiversity, SocialGraph};
use recommendation_engine::{
    FollowSuggestionEngine, RecommendationEngine, TrendingAlgorithm, TrendingRanker,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn candidate(category: &str, kind: CandidateKind, hours_old: i64) -> Candidate {
    Candidate {
        id: Uuid::new_v4(),
        kind,
        category: category.to_string(),
        location: None,
        price: None,
        created_at: reference_time() - Duration::hours(hours_old),
        starts_at: None,
        tags: Vec::new(),
        interests: Vec::new(),
        engagement: EngagementStats::default(),
    }
}

fn user(interests: &[&str], followers: u64) -> Candidate {
    let mut c = candidate("user", CandidateKind::User, 100);
    c.interests = interests.iter().map(|s| s.to_string()).collect();
    c.engagement.followers_count = followers;
    c
}

fn preference(category: &str, weight: f64) -> Preference {
    Preference {
        category: category.to_string(),
        weight,
        source: "explicit".to_string(),
        last_updated: reference_time(),
    }
}

#[test]
fn test_output_sorted_descending_for_varied_candidates() {
    let mut profile = RequesterProfile::new(Uuid::new_v4());
    profile.preferences = vec![preference("music", 0.6), preference("art", 0.3)];
    profile.location = Some(Location::new(47.61, -122.33));

    let categories = ["music", "art", "civic", "sports", "food"];
    let candidates: Vec<Candidate> = (0..25)
        .map(|i| {
            let kind = if i % 2 == 0 { CandidateKind::Post } else { CandidateKind::Event };
            let mut c = candidate(categories[i % categories.len()], kind, (i * 7) as i64);
            if i % 3 == 0 {
                c.location = Some(Location::new(47.61 + i as f64 * 0.05, -122.33));
            }
            c
        })
        .collect();

    let engine = RecommendationEngine::new();
    for limit in [1, 5, 10, 25, 40] {
        let recs = engine.generate_recommendations_at(&profile, &candidates, limit, reference_time());
        assert_eq!(recs.len(), limit.min(candidates.len()));
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[test]
fn test_ties_keep_input_order() {
    let profile = RequesterProfile::new(Uuid::new_v4());
    let candidates: Vec<Candidate> = (0..4).map(|_| candidate("music", CandidateKind::Post, 3)).collect();

    // Wide caps so the diversity pass accepts everything in order
    let engine = RecommendationEngine::new()
        .with_diversity_layer(recommendation_engine::DiversityLayer::new(10, 10));
    let recs = engine.generate_recommendations_at(&profile, &candidates, 4, reference_time());

    let ids: Vec<Uuid> = recs.iter().map(|r| r.content_id).collect();
    let expected: Vec<Uuid> = candidates.iter().map(|c| c.id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_closer_candidate_ranks_first() {
    let mut profile = RequesterProfile::new(Uuid::new_v4());
    profile.location = Some(Location::new(40.0, -75.0));

    // ~5 km and ~80 km north of the requester
    let mut near = candidate("music", CandidateKind::Event, 4);
    near.location = Some(Location::new(40.045, -75.0));
    near.price = Some(10.0);
    let mut far = candidate("music", CandidateKind::Event, 4);
    far.location = Some(Location::new(40.72, -75.0));
    far.price = Some(10.0);

    let engine = RecommendationEngine::new();
    let recs = engine.generate_recommendations_at(&profile, &[far.clone(), near.clone()], 2, reference_time());

    assert_eq!(recs[0].content_id, near.id);
    assert_eq!(recs[1].content_id, far.id);
    assert!(recs[0].breakdown.location > 0.8);
    assert_eq!(recs[1].breakdown.location, 0.0);
}

#[test]
fn test_empty_profile_uses_neutral_defaults() {
    let profile = RequesterProfile::new(Uuid::new_v4());
    let candidates = vec![
        candidate("music", CandidateKind::Event, 1),
        candidate("civic", CandidateKind::Post, 12),
        candidate("sports", CandidateKind::Post, 48),
    ];

    let recs = RecommendationEngine::new().generate_recommendations_at(&profile, &candidates, 3, reference_time());
    assert_eq!(recs.len(), 3);
    for rec in &recs {
        assert_eq!(rec.breakdown.content_based, 0.5);
        assert_eq!(rec.breakdown.collaborative, 0.5);
        assert_eq!(rec.breakdown.diversity, 0.8);
    }
}

#[test]
fn test_direct_preference_lookup() {
    let mut profile = RequesterProfile::new(Uuid::new_v4());
    profile.preferences.push(preference("music", 0.9));

    let recs = RecommendationEngine::new().generate_recommendations_at(
        &profile,
        &[candidate("music", CandidateKind::Event, 2)],
        1,
        reference_time(),
    );
    assert_eq!(recs[0].breakdown.content_based, 0.9);
}

#[test]
fn test_category_novelty_strategy_plugs_in() {
    let mut profile = RequesterProfile::new(Uuid::new_v4());
    profile.preferences.push(preference("music", 1.0));

    let engine = RecommendationEngine::with_strategies(
        Arc::new(SocialGraph::default()),
        Arc::new(CategoryNoveltyDiversity),
    );
    let recs = engine.generate_recommendations_at(
        &profile,
        &[candidate("music", CandidateKind::Post, 1), candidate("art", CandidateKind::Post, 1)],
        2,
        reference_time(),
    );

    let music = recs.iter().find(|r| r.breakdown.content_based == 1.0).unwrap();
    let art = recs.iter().find(|r| r.breakdown.content_based != 1.0).unwrap();
    assert_eq!(music.breakdown.diversity, 0.5);
    assert_eq!(art.breakdown.diversity, 1.0);
}

#[test]
fn test_follow_suggestions_never_include_excluded() {
    let candidates: Vec<Candidate> = (0..12).map(|i| user(&["music", "art"], i * 10)).collect();
    let excluded: HashSet<Uuid> = candidates.iter().step_by(3).map(|c| c.id).collect();

    let request = FollowRequest {
        requester_id: Uuid::new_v4(),
        interests: vec!["music".to_string()],
        location: None,
        follower_count: 30,
        excluded_ids: excluded.clone(),
    };

    let suggestions = FollowSuggestionEngine::new().generate_follow_suggestions_at(
        &request,
        &candidates,
        20,
        reference_time(),
    );

    assert_eq!(suggestions.len(), candidates.len() - excluded.len());
    assert!(suggestions.iter().all(|s| !excluded.contains(&s.user_id)));
    assert!(suggestions.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_graph_backed_mutual_connections() {
    let requester = Uuid::new_v4();
    let popular = user(&["hiking"], 0);
    let isolated = user(&["hiking"], 0);

    let mut graph = SocialGraph::default();
    for _ in 0..30 {
        let friend = Uuid::new_v4();
        graph.add_follow(requester, friend);
        graph.add_follow(friend, popular.id);
    }

    let request = FollowRequest {
        requester_id: requester,
        interests: vec!["hiking".to_string()],
        ..Default::default()
    };

    let engine = FollowSuggestionEngine::with_mutual_connections(Arc::new(graph));
    let suggestions = engine.generate_follow_suggestions_at(
        &request,
        &[isolated.clone(), popular.clone()],
        2,
        reference_time(),
    );

    assert_eq!(suggestions[0].user_id, popular.id);
    assert!((suggestions[0].breakdown.mutual_connections - 0.6).abs() < 1e-9);
    assert!(suggestions[0].reason.contains("30 mutual connections"));
    assert_eq!(suggestions[1].breakdown.mutual_connections, 0.0);
}

#[test]
fn test_trending_reference_scenario() {
    let now = reference_time();
    let item = NewsItem {
        id: Uuid::new_v4(),
        source: "Tribune".to_string(),
        category: "local".to_string(),
        city: Some("Austin".to_string()),
        country: Some("US".to_string()),
        likes: 10,
        comments: 5,
        shares: 3,
        poll_votes: 2,
        published_at: now - Duration::hours(2),
    };
    let viewer = Locality {
        city: Some("Austin".to_string()),
        country: Some("US".to_string()),
    };

    let score = TrendingAlgorithm::default().compute_trending_score(&item, Some(&viewer), now);
    assert!((score - 27.10).abs() < 0.01, "got {}", score);

    let ranked = TrendingRanker::default().rank(&[item.clone()], Some(&viewer), None, now, 10);
    assert_eq!(ranked.len(), 1);
    assert!((ranked[0].trending_score - score).abs() < 1e-12);
}
