use thiserror::Error;

/// Errors that can occur while searching for or loading recipes
#[derive(Error, Debug)]
pub enum SearchError {
    /// User input was empty or unusable; raised before any network call
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// HTTP request failed or returned a non-2xx status
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the JSON shape we expect
    #[error("Unreadable response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Ingredient search could not reach the recipe source
    #[error("Failed to fetch recipes. Please check your connection and try again.")]
    SearchFailed(#[source] Box<SearchError>),

    /// Random recipe request could not reach the recipe source
    #[error("Failed to fetch random recipe. Please try again.")]
    RandomFailed(#[source] Box<SearchError>),

    /// Category listing could not reach the recipe source
    #[error("Failed to fetch categories. Please try again.")]
    CategoryFailed(#[source] Box<SearchError>),

    /// Recipes in a category could not be fetched
    #[error("Failed to fetch recipes by category. Please try again.")]
    CategoryRecipesFailed(#[source] Box<SearchError>),

    /// Lookup succeeded but no recipe has this id
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    /// Random endpoint answered with an empty list
    #[error("No random recipe available")]
    NoRandomRecipe,

    /// HTTP client could not be constructed
    #[error("Client error: {0}")]
    ClientError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl SearchError {
    pub(crate) fn search_failed(err: SearchError) -> Self {
        SearchError::SearchFailed(Box::new(err))
    }

    pub(crate) fn random_failed(err: SearchError) -> Self {
        SearchError::RandomFailed(Box::new(err))
    }

    pub(crate) fn category_failed(err: SearchError) -> Self {
        SearchError::CategoryFailed(Box::new(err))
    }

    pub(crate) fn category_recipes_failed(err: SearchError) -> Self {
        SearchError::CategoryRecipesFailed(Box::new(err))
    }

    /// Whether re-submitting the same request may succeed.
    ///
    /// Nothing is retried automatically; callers use this to decide
    /// whether to offer a retry to the user.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SearchError::Transport(_)
                | SearchError::Decode(_)
                | SearchError::SearchFailed(_)
                | SearchError::RandomFailed(_)
                | SearchError::CategoryFailed(_)
                | SearchError::CategoryRecipesFailed(_)
        )
    }

    /// Text suitable for showing to the end user
    pub fn user_message(&self) -> String {
        match self {
            SearchError::InvalidQuery(reason) => reason.clone(),
            SearchError::RecipeNotFound(_) => "Recipe not found".to_string(),
            SearchError::Transport(_) | SearchError::Decode(_) => {
                "Something went wrong while contacting the recipe service. Please try again."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}
