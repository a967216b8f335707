//! Pure display and normalization helpers.

use serde::Serialize;
use std::borrow::Cow;

use crate::model::{Ingredient, IngredientSlot, RecipeDetail};
use crate::query::IngredientQuery;

/// Default cut-off for [`truncate_text`]
pub const DEFAULT_TRUNCATE_LEN: usize = 100;

/// Collect the non-blank ingredient slots, keeping slot order
pub fn extract_ingredients(slots: &[IngredientSlot]) -> Vec<Ingredient> {
    slots
        .iter()
        .filter_map(|slot| {
            let name = slot.name.as_deref()?.trim();
            if name.is_empty() {
                return None;
            }
            Some(Ingredient {
                name: name.to_string(),
                measure: slot.measure.as_deref().unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}

/// Shorten `text` to `max_len` characters, ending with `...` when cut
pub fn truncate_text(text: &str, max_len: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_len) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}...", text[..cut].trim())),
    }
}

pub fn image_url_or_placeholder<'a>(url: Option<&'a str>, placeholder: &'a str) -> &'a str {
    url.filter(|u| !u.trim().is_empty()).unwrap_or(placeholder)
}

/// Join items as an English list: "a", "a and b", "a, b, and c"
pub fn join_ingredients<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [head @ .., last] => {
            let head: Vec<&str> = head.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Format a raw search string for headings.
///
/// Multi-ingredient searches are re-parsed and joined with
/// [`join_ingredients`]; anything else is shown as typed.
pub fn format_search_term(raw: &str, multi: bool) -> String {
    if raw.is_empty() {
        return String::new();
    }
    if multi {
        join_ingredients(IngredientQuery::parse(raw).tokens())
    } else {
        raw.to_string()
    }
}

/// Loose ingredient match: either side may contain the other, ignoring case
pub fn contains_any_ingredient<S: AsRef<str>>(text: &str, ingredients: &[S]) -> bool {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return false;
    }
    ingredients.iter().any(|ingredient| {
        let ingredient = ingredient.as_ref().trim().to_lowercase();
        !ingredient.is_empty() && (text.contains(&ingredient) || ingredient.contains(&text))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionStep {
    pub number: usize,
    pub text: String,
}

/// Split instructions into numbered steps, one per non-empty line
pub fn instruction_steps(instructions: &str) -> Vec<InstructionStep> {
    instructions
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, text)| InstructionStep {
            number: index + 1,
            text: text.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn colour(&self) -> &'static str {
        match self {
            Difficulty::Easy => "green",
            Difficulty::Medium => "yellow",
            Difficulty::Hard => "red",
        }
    }
}

/// Rough difficulty from ingredient count and instruction length
pub fn difficulty(recipe: &RecipeDetail) -> Difficulty {
    let ingredients = recipe.ingredients.len();
    let instructions = recipe.instructions.chars().count();

    if ingredients <= 5 && instructions <= 500 {
        Difficulty::Easy
    } else if ingredients <= 10 && instructions <= 1000 {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}
