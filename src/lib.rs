pub mod builder;
pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod model;
pub mod query;
pub mod session;
pub mod source;

// Re-export commonly used types
pub use builder::{RecipeSearch, RecipeSearchBuilder};
pub use config::SearchConfig;
pub use error::SearchError;
pub use gateway::RecipeGateway;
pub use model::{Category, Ingredient, RecipeDetail, RecipeSummary};
pub use query::{IngredientQuery, SearchContext};
pub use session::{QueryState, QueryTicket, RecipeListSession, SearchSession};
pub use source::{MealDbClient, RecipeSource};

fn default_gateway() -> Result<RecipeGateway<MealDbClient>, SearchError> {
    RecipeSearch::builder().config(SearchConfig::load()?).build()
}

/// Search recipes for comma separated ingredients, e.g. `"chicken, rice"`.
///
/// Uses `mealdb-search.toml` / `MEALDB__*` configuration when present.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipes = mealdb_search::search_recipes("chicken, tomato").await?;
/// for recipe in recipes {
///     println!("{} {}", recipe.id, recipe.name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search_recipes(ingredients: &str) -> Result<Vec<RecipeSummary>, SearchError> {
    let gateway = default_gateway()?;
    gateway
        .search_by_ingredients(&IngredientQuery::parse(ingredients))
        .await
}

/// Fetch one recipe by its TheMealDB id
pub async fn recipe_by_id(id: &str) -> Result<RecipeDetail, SearchError> {
    default_gateway()?.get_by_id(id).await
}

/// Fetch a random recipe
pub async fn random_recipe() -> Result<RecipeDetail, SearchError> {
    default_gateway()?.get_random().await
}
