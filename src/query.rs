use serde::Serialize;
use std::fmt;

use crate::format::format_search_term;

/// Upper bound on ingredients taken from one search
pub const MAX_INGREDIENTS: usize = 5;

/// Normalized list of ingredient tokens typed by the user.
///
/// Tokens are trimmed, longer than one character, distinct (ignoring case)
/// and capped at [`MAX_INGREDIENTS`], in the order they were entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngredientQuery {
    tokens: Vec<String>,
}

impl IngredientQuery {
    /// Parse comma separated user input
    ///
    /// # Example
    /// ```
    /// use mealdb_search::IngredientQuery;
    ///
    /// let query = IngredientQuery::parse("chicken, a, tomato");
    /// assert_eq!(query.tokens(), ["chicken", "tomato"]);
    /// ```
    pub fn parse(raw: &str) -> Self {
        Self::from_tokens(raw.split(','))
    }

    /// Build from already split tokens, applying the same normalization as [`parse`](Self::parse)
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::with_capacity(MAX_INGREDIENTS);

        for token in tokens {
            if kept.len() == MAX_INGREDIENTS {
                break;
            }

            let token = token.as_ref().trim();
            // Single characters are stray punctuation or typos
            if token.chars().count() <= 1 {
                continue;
            }

            let lowered = token.to_lowercase();
            if kept.iter().any(|k| k.to_lowercase() == lowered) {
                continue;
            }

            kept.push(token.to_string());
        }

        Self { tokens: kept }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// First token; the only one sent to the remote filter
    pub fn anchor(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Tokens after the anchor, matched on the client
    pub fn rest(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_multi(&self) -> bool {
        self.tokens.len() > 1
    }
}

impl fmt::Display for IngredientQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(", "))
    }
}

/// Everything known about one search request.
///
/// Passed explicitly to the gateway and the UI instead of living in
/// shared "current search" state.
#[derive(Debug, Clone)]
pub struct SearchContext {
    raw: String,
    query: IngredientQuery,
}

impl SearchContext {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let query = IngredientQuery::parse(&raw);
        Self { raw, query }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn query(&self) -> &IngredientQuery {
        &self.query
    }

    pub fn is_multi(&self) -> bool {
        self.query.is_multi()
    }

    /// Human readable form of the search, e.g. "chicken, tomato, and basil"
    pub fn display_term(&self) -> String {
        format_search_term(&self.raw, self.is_multi())
    }
}
