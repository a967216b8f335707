use futures_util::future::join_all;
use log::{debug, info, warn};

use crate::config::DEFAULT_CANDIDATE_LIMIT;
use crate::error::SearchError;
use crate::format::contains_any_ingredient;
use crate::model::{Category, RecipeDetail, RecipeSummary};
use crate::query::{IngredientQuery, SearchContext};
use crate::source::RecipeSource;

/// An anchor candidate after its detail lookup
#[derive(Debug, Clone)]
enum Candidate {
    Detailed(RecipeDetail),
    /// Lookup failed; only the filter result is known
    Degraded(RecipeSummary),
}

impl Candidate {
    /// Degraded candidates carry no ingredient data and always match
    fn matches_any(&self, tokens: &[String]) -> bool {
        match self {
            Candidate::Detailed(detail) => detail
                .ingredients
                .iter()
                .any(|ingredient| contains_any_ingredient(&ingredient.name, tokens)),
            Candidate::Degraded(_) => true,
        }
    }

    fn into_summary(self) -> RecipeSummary {
        match self {
            Candidate::Detailed(detail) => detail.into(),
            Candidate::Degraded(summary) => summary,
        }
    }
}

/// Turns ingredient queries into recipe lists against a [`RecipeSource`]
#[derive(Debug, Clone)]
pub struct RecipeGateway<S> {
    source: S,
    candidate_limit: usize,
}

impl<S: RecipeSource> RecipeGateway<S> {
    pub fn new(source: S) -> Self {
        RecipeGateway {
            source,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }

    /// Override how many anchor candidates get a detail lookup
    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = limit;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn candidate_limit(&self) -> usize {
        self.candidate_limit
    }

    /// Run the search described by `context`
    pub async fn search(&self, context: &SearchContext) -> Result<Vec<RecipeSummary>, SearchError> {
        self.search_by_ingredients(context.query()).await
    }

    /// Find recipes using every ingredient in `query` as closely as the API allows.
    ///
    /// Only the first ingredient (the anchor) is sent to the remote filter.
    /// With more than one ingredient, the details of the first
    /// `candidate_limit` anchor results are fetched concurrently and kept
    /// when any of their ingredients loosely matches one of the remaining
    /// tokens. If nothing matches, the full anchor result is returned.
    pub async fn search_by_ingredients(
        &self,
        query: &IngredientQuery,
    ) -> Result<Vec<RecipeSummary>, SearchError> {
        let anchor = query.anchor().ok_or_else(|| {
            SearchError::InvalidQuery("Please enter at least one ingredient".to_string())
        })?;

        let candidates = self
            .source
            .filter_by_ingredient(anchor)
            .await
            .map_err(SearchError::search_failed)?;

        let others = query.rest();
        if others.is_empty() || candidates.is_empty() {
            info!(
                "Search for '{}' returned {} recipes",
                query,
                candidates.len()
            );
            return Ok(candidates);
        }

        let limit = self.candidate_limit.min(candidates.len());
        let batch = self.fetch_candidates(&candidates[..limit]).await;

        let matched: Vec<RecipeSummary> = batch
            .into_iter()
            .filter(|candidate| candidate.matches_any(others))
            .map(Candidate::into_summary)
            .collect();

        if matched.is_empty() {
            info!(
                "No candidate for '{}' matched {:?}, returning all {} '{}' recipes",
                query,
                others,
                candidates.len(),
                anchor
            );
            return Ok(candidates);
        }

        info!(
            "Search for '{}' matched {} of {} candidates",
            query,
            matched.len(),
            limit
        );
        Ok(matched)
    }

    /// Look up every candidate concurrently; one entry per candidate, in order
    async fn fetch_candidates(&self, candidates: &[RecipeSummary]) -> Vec<Candidate> {
        debug!("Fetching details for {} candidates", candidates.len());

        join_all(candidates.iter().map(|summary| async move {
            match self.source.lookup_by_id(&summary.id).await {
                Ok(Some(detail)) => Candidate::Detailed(detail),
                Ok(None) => {
                    warn!("Recipe {} vanished during lookup, keeping summary", summary.id);
                    Candidate::Degraded(summary.clone())
                }
                Err(e) => {
                    warn!("Failed to get details for recipe {}: {}", summary.id, e);
                    Candidate::Degraded(summary.clone())
                }
            }
        }))
        .await
    }

    /// Load one recipe with ingredients and instructions
    pub async fn get_by_id(&self, id: &str) -> Result<RecipeDetail, SearchError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(SearchError::InvalidQuery("Recipe ID is required".to_string()));
        }

        self.source
            .lookup_by_id(id)
            .await?
            .ok_or_else(|| SearchError::RecipeNotFound(id.to_string()))
    }

    pub async fn get_random(&self) -> Result<RecipeDetail, SearchError> {
        self.source
            .random()
            .await
            .map_err(SearchError::random_failed)?
            .ok_or(SearchError::NoRandomRecipe)
    }

    /// Recipes in a category; a blank category yields an empty list
    pub async fn recipes_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<RecipeSummary>, SearchError> {
        let category = category.trim();
        if category.is_empty() {
            return Ok(Vec::new());
        }

        self.source
            .filter_by_category(category)
            .await
            .map_err(SearchError::category_recipes_failed)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, SearchError> {
        self.source
            .categories()
            .await
            .map_err(SearchError::category_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ingredient;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    fn transport_failure() -> SearchError {
        SearchError::Decode(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err())
    }

    fn summary(id: &str) -> RecipeSummary {
        RecipeSummary {
            id: id.to_string(),
            name: format!("Recipe {id}"),
            thumbnail_url: None,
            category: None,
            area: None,
        }
    }

    fn detail(id: &str, ingredients: &[&str]) -> RecipeDetail {
        RecipeDetail {
            id: id.to_string(),
            name: format!("Recipe {id}"),
            thumbnail_url: None,
            category: Some("Chicken".to_string()),
            area: None,
            instructions: "Cook.".to_string(),
            ingredients: ingredients
                .iter()
                .map(|name| Ingredient {
                    name: name.to_string(),
                    measure: "1".to_string(),
                })
                .collect(),
            video_url: None,
            source_url: None,
            tags: Vec::new(),
        }
    }

    /// In-memory source that records every call
    #[derive(Default)]
    struct FakeSource {
        by_ingredient: HashMap<String, Vec<RecipeSummary>>,
        details: HashMap<String, RecipeDetail>,
        failing: HashSet<String>,
        random: Option<RecipeDetail>,
        offline: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn lookups(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| c.starts_with("lookup:"))
                .count()
        }

        fn with_candidates(mut self, ingredient: &str, ids: &[String]) -> Self {
            self.by_ingredient.insert(
                ingredient.to_string(),
                ids.iter().map(|id| summary(id)).collect(),
            );
            self
        }

        fn with_detail(mut self, id: &str, ingredients: &[&str]) -> Self {
            self.details.insert(id.to_string(), detail(id, ingredients));
            self
        }
    }

    #[async_trait]
    impl RecipeSource for FakeSource {
        async fn filter_by_ingredient(
            &self,
            ingredient: &str,
        ) -> Result<Vec<RecipeSummary>, SearchError> {
            self.record(format!("filter:{ingredient}"));
            if self.offline {
                return Err(transport_failure());
            }
            Ok(self
                .by_ingredient
                .get(ingredient)
                .cloned()
                .unwrap_or_default())
        }

        async fn filter_by_category(
            &self,
            category: &str,
        ) -> Result<Vec<RecipeSummary>, SearchError> {
            self.record(format!("category:{category}"));
            if self.offline {
                return Err(transport_failure());
            }
            Ok(vec![summary("52940")])
        }

        async fn lookup_by_id(&self, id: &str) -> Result<Option<RecipeDetail>, SearchError> {
            self.record(format!("lookup:{id}"));
            if self.offline || self.failing.contains(id) {
                return Err(transport_failure());
            }
            Ok(self.details.get(id).cloned())
        }

        async fn random(&self) -> Result<Option<RecipeDetail>, SearchError> {
            self.record("random".to_string());
            if self.offline {
                return Err(transport_failure());
            }
            Ok(self.random.clone())
        }

        async fn categories(&self) -> Result<Vec<Category>, SearchError> {
            self.record("categories".to_string());
            if self.offline {
                return Err(transport_failure());
            }
            Ok(Vec::new())
        }
    }

    fn ids(range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_anchor_filter_only_uses_first_token() {
        let source = FakeSource::default()
            .with_candidates("chicken", &ids(1..3))
            .with_detail("1", &["Chicken", "Basil"])
            .with_detail("2", &["Chicken", "Rice"]);
        let gateway = RecipeGateway::new(source);

        let query = IngredientQuery::parse("chicken, tomato, basil");
        let recipes = gateway.search_by_ingredients(&query).await.unwrap();

        let filters: Vec<String> = gateway
            .source()
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("filter:"))
            .collect();
        assert_eq!(filters, vec!["filter:chicken"]);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, "1");
        assert_eq!(recipes[0].category.as_deref(), Some("Chicken"));
    }

    #[tokio::test]
    async fn test_empty_anchor_result_skips_lookups() {
        let gateway = RecipeGateway::new(FakeSource::default());

        let query = IngredientQuery::parse("unicorn, tomato");
        let recipes = gateway.search_by_ingredients(&query).await.unwrap();

        assert!(recipes.is_empty());
        assert_eq!(gateway.source().lookups(), 0);
    }

    #[tokio::test]
    async fn test_fallback_returns_full_anchor_list() {
        let mut source = FakeSource::default().with_candidates("beef", &ids(0..25));
        for id in ids(0..25) {
            source = source.with_detail(&id, &["Beef", "Onion"]);
        }
        let anchor_list = source.by_ingredient["beef"].clone();
        let gateway = RecipeGateway::new(source);

        let query = IngredientQuery::parse("beef, saffron");
        let recipes = gateway.search_by_ingredients(&query).await.unwrap();

        assert_eq!(recipes, anchor_list);
        assert_eq!(gateway.source().lookups(), 20);
    }

    #[tokio::test]
    async fn test_only_first_candidates_are_fetched() {
        let mut source = FakeSource::default().with_candidates("rice", &ids(0..30));
        for id in ids(0..30) {
            source = source.with_detail(&id, &["Rice", "Peas"]);
        }
        let gateway = RecipeGateway::new(source).with_candidate_limit(10);

        let query = IngredientQuery::parse("rice, peas");
        let recipes = gateway.search_by_ingredients(&query).await.unwrap();

        assert_eq!(recipes.len(), 10);
        assert_eq!(recipes[0].id, "0");
        assert_eq!(recipes[9].id, "9");
        assert_eq!(gateway.source().lookups(), 10);
    }

    #[tokio::test]
    async fn test_failed_lookup_degrades_without_aborting_batch() {
        let mut source = FakeSource::default();
        for id in ids(0..20) {
            source = source.with_detail(&id, &["Pasta"]);
        }
        source.failing.insert("7".to_string());
        let gateway = RecipeGateway::new(source);

        let candidates: Vec<RecipeSummary> = ids(0..20).iter().map(|id| summary(id)).collect();
        let batch = gateway.fetch_candidates(&candidates).await;

        assert_eq!(batch.len(), 20);
        assert!(matches!(&batch[7], Candidate::Degraded(s) if s.id == "7"));
        assert!(matches!(&batch[8], Candidate::Detailed(d) if d.id == "8"));
    }

    #[tokio::test]
    async fn test_degraded_candidate_is_kept_in_order() {
        let mut source = FakeSource::default()
            .with_candidates("pasta", &ids(1..4))
            .with_detail("1", &["Pasta", "Cherry Tomatoes"])
            .with_detail("3", &["Pasta", "Garlic"]);
        source.failing.insert("2".to_string());
        let gateway = RecipeGateway::new(source);

        let query = IngredientQuery::parse("pasta, tomato");
        let recipes = gateway.search_by_ingredients(&query).await.unwrap();

        let found: Vec<&str> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(found, ["1", "2"]);
    }

    #[tokio::test]
    async fn test_match_is_bidirectional_and_case_insensitive() {
        let source = FakeSource::default()
            .with_candidates("salmon", &ids(1..3))
            .with_detail("1", &["Salmon", "Tomato"])
            .with_detail("2", &["Salmon", "DILL"]);
        let gateway = RecipeGateway::new(source);

        let query = IngredientQuery::parse("salmon, Tomatoes, dill");
        let recipes = gateway.search_by_ingredients(&query).await.unwrap();

        assert_eq!(recipes.len(), 2);
    }

    #[tokio::test]
    async fn test_single_ingredient_does_not_fetch_details() {
        let source = FakeSource::default().with_candidates("egg", &ids(1..6));
        let gateway = RecipeGateway::new(source);

        let query = IngredientQuery::parse("egg");
        let recipes = gateway.search_by_ingredients(&query).await.unwrap();

        assert_eq!(recipes.len(), 5);
        assert_eq!(gateway.source().calls(), vec!["filter:egg"]);
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_before_network() {
        let gateway = RecipeGateway::new(FakeSource::default());

        let err = gateway
            .search(&SearchContext::new(" , x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::InvalidQuery(_)));
        assert!(gateway.source().calls().is_empty());
    }

    #[tokio::test]
    async fn test_anchor_failure_is_search_failed() {
        let source = FakeSource {
            offline: true,
            ..Default::default()
        };
        let gateway = RecipeGateway::new(source);

        let err = gateway
            .search_by_ingredients(&IngredientQuery::parse("chicken, rice"))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::SearchFailed(_)));
        assert!(err.is_retryable());
        assert_eq!(gateway.source().lookups(), 0);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let source = FakeSource::default().with_detail("52772", &["soy sauce"]);
        let gateway = RecipeGateway::new(source);

        let recipe = gateway.get_by_id(" 52772 ").await.unwrap();
        assert_eq!(recipe.id, "52772");

        let err = gateway.get_by_id("1").await.unwrap_err();
        assert!(matches!(err, SearchError::RecipeNotFound(ref id) if id == "1"));

        let err = gateway.get_by_id("").await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_get_random() {
        let gateway = RecipeGateway::new(FakeSource::default());
        assert!(matches!(
            gateway.get_random().await.unwrap_err(),
            SearchError::NoRandomRecipe
        ));

        let source = FakeSource {
            random: Some(detail("53000", &["Flour"])),
            ..Default::default()
        };
        let gateway = RecipeGateway::new(source);
        assert_eq!(gateway.get_random().await.unwrap().id, "53000");

        let source = FakeSource {
            offline: true,
            ..Default::default()
        };
        let gateway = RecipeGateway::new(source);
        assert!(matches!(
            gateway.get_random().await.unwrap_err(),
            SearchError::RandomFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_recipes_by_category() {
        let gateway = RecipeGateway::new(FakeSource::default());

        assert!(gateway.recipes_by_category("  ").await.unwrap().is_empty());
        assert!(gateway.source().calls().is_empty());

        let recipes = gateway.recipes_by_category("Dessert").await.unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(gateway.source().calls(), vec!["category:Dessert"]);

        let source = FakeSource {
            offline: true,
            ..Default::default()
        };
        let gateway = RecipeGateway::new(source);
        assert!(matches!(
            gateway.categories().await.unwrap_err(),
            SearchError::CategoryFailed(_)
        ));
        let err = gateway.recipes_by_category("Dessert").await.unwrap_err();
        assert!(matches!(err, SearchError::CategoryRecipesFailed(_)));
        assert_eq!(
            err.to_string(),
            "Failed to fetch recipes by category. Please try again."
        );
    }
}
