use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// TheMealDB public v1 endpoint (free test key `1`)
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Image shown when a recipe has no thumbnail
pub const DEFAULT_PLACEHOLDER_IMAGE: &str =
    "https://via.placeholder.com/300x300/f3f4f6/9ca3af?text=Recipe";

/// Maximum number of anchor candidates whose details are fetched
pub const DEFAULT_CANDIDATE_LIMIT: usize = 20;

/// Client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Base URL of the recipe API, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// How many anchor candidates get a detail lookup in multi-ingredient searches
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    /// Request timeout in seconds. Unset means no client-side timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Fallback image for recipes without a thumbnail
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            candidate_limit: default_candidate_limit(),
            timeout_secs: None,
            placeholder_image: default_placeholder_image(),
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_candidate_limit() -> usize {
    DEFAULT_CANDIDATE_LIMIT
}

fn default_placeholder_image() -> String {
    DEFAULT_PLACEHOLDER_IMAGE.to_string()
}

fn default_user_agent() -> String {
    format!("mealdb-search/{}", env!("CARGO_PKG_VERSION"))
}

impl SearchConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEALDB__ prefix
    /// 2. mealdb-search.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEALDB__CANDIDATE_LIMIT
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Load configuration from file and environment variables
///
/// See [`SearchConfig::load`] for the source priority.
pub fn load_config() -> Result<SearchConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("mealdb-search").required(false))
        // Use double underscore after the prefix: MEALDB__BASE_URL
        .add_source(
            Environment::with_prefix("MEALDB")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
