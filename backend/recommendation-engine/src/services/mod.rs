pub mod content;
pub mod diversity;
pub mod follow;
pub mod graph;
pub mod pipeline;
pub mod reason;
pub mod trending;

pub use diversity::DiversityLayer;
pub use pipeline::{FollowSuggestionEngine, RecommendationEngine};
pub use trending::{TrendingAlgorithm, TrendingRanker};
