mod mealdb;

pub use mealdb::MealDbClient;

use async_trait::async_trait;

use crate::error::SearchError;
use crate::model::{Category, RecipeDetail, RecipeSummary};

/// A remote recipe database.
///
/// Implementations normalize "no results" into empty lists or `None`;
/// a transport or decode failure is the only error they return.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Recipes that use the given ingredient
    async fn filter_by_ingredient(&self, ingredient: &str)
        -> Result<Vec<RecipeSummary>, SearchError>;

    /// Recipes in the given category
    async fn filter_by_category(&self, category: &str) -> Result<Vec<RecipeSummary>, SearchError>;

    /// Full recipe by id, `None` when the id is unknown
    async fn lookup_by_id(&self, id: &str) -> Result<Option<RecipeDetail>, SearchError>;

    /// One random recipe, `None` when the source returned nothing
    async fn random(&self) -> Result<Option<RecipeDetail>, SearchError>;

    async fn categories(&self) -> Result<Vec<Category>, SearchError>;
}
