use std::time::Duration;

use crate::{MealDbClient, RecipeGateway, SearchConfig, SearchError};

/// Builder for configuring a [`RecipeGateway`] backed by TheMealDB
#[derive(Debug, Default)]
pub struct RecipeSearchBuilder {
    config: Option<SearchConfig>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    candidate_limit: Option<usize>,
    user_agent: Option<String>,
}

impl RecipeSearchBuilder {
    /// Start from a loaded configuration instead of the defaults
    ///
    /// Options set directly on the builder take precedence.
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Point the client at another API root, e.g. a mirror or a test server
    ///
    /// # Example
    /// ```
    /// use mealdb_search::RecipeSearch;
    ///
    /// let builder = RecipeSearch::builder()
    ///     .base_url("http://localhost:8080/api/json/v1/1");
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use mealdb_search::RecipeSearch;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeSearch::builder()
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Number of anchor results inspected in multi-ingredient searches
    pub fn candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = Some(limit);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Resolve the effective configuration and request timeout
    fn resolve(self) -> Result<(SearchConfig, Option<Duration>), SearchError> {
        let mut config = self.config.unwrap_or_default();

        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(limit) = self.candidate_limit {
            config.candidate_limit = limit;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        if config.base_url.trim().is_empty() {
            return Err(SearchError::ClientError(
                "Base URL cannot be empty".to_string(),
            ));
        }

        let timeout = self.timeout.or_else(|| config.timeout());
        Ok((config, timeout))
    }

    /// Build the gateway
    ///
    /// # Errors
    /// Returns `SearchError::ClientError` if the base URL is empty or the
    /// HTTP client cannot be created.
    ///
    /// # Example
    /// ```no_run
    /// # use mealdb_search::{IngredientQuery, RecipeSearch};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let gateway = RecipeSearch::builder().build()?;
    /// let recipes = gateway
    ///     .search_by_ingredients(&IngredientQuery::parse("chicken, garlic"))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<RecipeGateway<MealDbClient>, SearchError> {
        let (config, timeout) = self.resolve()?;
        let client = MealDbClient::from_config_with_timeout(&config, timeout)?;
        Ok(RecipeGateway::new(client).with_candidate_limit(config.candidate_limit))
    }
}

/// Main entry point for the builder API
pub struct RecipeSearch;

impl RecipeSearch {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use mealdb_search::RecipeSearch;
    ///
    /// let builder = RecipeSearch::builder();
    /// ```
    pub fn builder() -> RecipeSearchBuilder {
        RecipeSearchBuilder::default()
    }
}
