//! Configuration for the recommendation engine
use crate::error::{EngineError, Result};
use serde::Deserialize;

/// Engine configuration, loaded from environment variables
///
/// Score weights are compile-time constants and deliberately absent here.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Limit used when a request does not carry one
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Requests asking for more are capped to this
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Diversity caps among accepted items
    #[serde(default = "default_max_per_category")]
    pub max_per_category: usize,

    #[serde(default = "default_max_per_type")]
    pub max_per_type: usize,

    /// Lifetime of content recommendations
    #[serde(default = "default_recommendation_ttl_hours")]
    pub recommendation_ttl_hours: i64,

    /// How many preferred cities/sources/categories to derive from history
    #[serde(default = "default_preferred_news_top_n")]
    pub preferred_news_top_n: usize,

    /// "json" or "text"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_service_name() -> String {
    "recommendation-engine".to_string()
}

fn default_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    100
}

fn default_max_per_category() -> usize {
    3
}

fn default_max_per_type() -> usize {
    2
}

fn default_recommendation_ttl_hours() -> i64 {
    24
}

fn default_preferred_news_top_n() -> usize {
    3
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            max_per_category: default_max_per_category(),
            max_per_type: default_max_per_type(),
            recommendation_ttl_hours: default_recommendation_ttl_hours(),
            preferred_news_top_n: default_preferred_news_top_n(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config: Config = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_limit == 0 || self.max_limit == 0 {
            return Err(EngineError::Config("limits must be positive".to_string()));
        }
        if self.default_limit > self.max_limit {
            return Err(EngineError::Config(format!(
                "DEFAULT_LIMIT {} exceeds MAX_LIMIT {}",
                self.default_limit, self.max_limit
            )));
        }
        if self.max_per_category == 0 || self.max_per_type == 0 {
            return Err(EngineError::Config("diversity caps must be positive".to_string()));
        }
        if self.recommendation_ttl_hours <= 0 {
            return Err(EngineError::Config(
                "RECOMMENDATION_TTL_HOURS must be positive".to_string(),
            ));
        }
        match self.log_format.as_str() {
            "json" | "text" => Ok(()),
            other => Err(EngineError::Config(format!("unknown LOG_FORMAT: {}", other))),
        }
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == "json"
    }
}
