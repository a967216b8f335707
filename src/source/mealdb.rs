use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::model::{
    Category, CategoriesResponse, CategoryPayload, MealPayload, MealsResponse, RecipeDetail,
    RecipeSummary,
};
use crate::source::RecipeSource;

/// HTTP client for the TheMealDB JSON API
#[derive(Debug, Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    /// Create a client for the public TheMealDB endpoint with default settings
    pub fn new() -> Result<Self, SearchError> {
        Self::from_config(&SearchConfig::default())
    }

    /// Create a client from configuration
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Self::from_config_with_timeout(config, config.timeout())
    }

    /// Create a client from configuration with an explicit request timeout,
    /// which replaces `timeout_secs`
    pub fn from_config_with_timeout(
        config: &SearchConfig,
        timeout: Option<Duration>,
    ) -> Result<Self, SearchError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SearchError::ClientError(format!("Failed to create HTTP client: {e}")))?;

        Ok(MealDbClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        MealDbClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SearchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let body = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }

    async fn summaries(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Vec<RecipeSummary>, SearchError> {
        let response: MealsResponse = self.get_json("filter.php", query).await?;
        let summaries: Vec<RecipeSummary> = response
            .meals
            .into_iter()
            .filter_map(MealPayload::into_summary)
            .collect();
        debug!("filter {:?} returned {} recipes", query, summaries.len());
        Ok(summaries)
    }

    async fn first_detail(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<RecipeDetail>, SearchError> {
        let response: MealsResponse = self.get_json(endpoint, query).await?;
        Ok(response
            .meals
            .into_iter()
            .find_map(MealPayload::into_detail))
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<Vec<RecipeSummary>, SearchError> {
        self.summaries(&[("i", ingredient)]).await
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<RecipeSummary>, SearchError> {
        self.summaries(&[("c", category)]).await
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Option<RecipeDetail>, SearchError> {
        self.first_detail("lookup.php", &[("i", id)]).await
    }

    async fn random(&self) -> Result<Option<RecipeDetail>, SearchError> {
        self.first_detail("random.php", &[]).await
    }

    async fn categories(&self) -> Result<Vec<Category>, SearchError> {
        let response: CategoriesResponse = self.get_json("categories.php", &[]).await?;
        Ok(response
            .categories
            .into_iter()
            .filter_map(CategoryPayload::into_category)
            .collect())
    }
}
