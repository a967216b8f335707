use log::warn;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::format::extract_ingredients;

/// Number of indexed ingredient/measure pairs on a TheMealDB meal
pub const INGREDIENT_SLOTS: usize = 20;

/// A recipe as returned by list and filter endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

/// A fully loaded recipe, with ingredients and instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeDetail {
    pub id: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: String,
    /// In slot order, blank slots removed
    pub ingredients: Vec<Ingredient>,
    pub video_url: Option<String>,
    pub source_url: Option<String>,
    pub tags: Vec<String>,
}

/// Summary projection; keeps category and area, which filter results lack
impl From<RecipeDetail> for RecipeSummary {
    fn from(detail: RecipeDetail) -> Self {
        RecipeSummary {
            id: detail.id,
            name: detail.name,
            thumbnail_url: detail.thumbnail_url,
            category: detail.category,
            area: detail.area,
        }
    }
}

/// A recipe category from the categories endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub description: String,
}

/// One raw `strIngredientN` / `strMeasureN` pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSlot {
    pub name: Option<String>,
    pub measure: Option<String>,
}

impl IngredientSlot {
    pub fn new(name: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            measure: Some(measure.into()),
        }
    }
}

/// A meal record exactly as the API sends it.
///
/// The numbered ingredient fields are folded into `slots` during
/// deserialization, so nothing downstream looks fields up by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawMeal")]
pub struct MealPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub youtube: Option<String>,
    pub source: Option<String>,
    pub tags: Option<String>,
    pub slots: [IngredientSlot; INGREDIENT_SLOTS],
}

#[derive(Deserialize)]
struct RawMeal {
    #[serde(rename = "idMeal")]
    id: Option<String>,
    #[serde(rename = "strMeal")]
    name: Option<String>,
    #[serde(rename = "strMealThumb")]
    thumbnail: Option<String>,
    #[serde(rename = "strCategory")]
    category: Option<String>,
    #[serde(rename = "strArea")]
    area: Option<String>,
    #[serde(rename = "strInstructions")]
    instructions: Option<String>,
    #[serde(rename = "strYoutube")]
    youtube: Option<String>,
    #[serde(rename = "strSource")]
    source: Option<String>,
    #[serde(rename = "strTags")]
    tags: Option<String>,
    #[serde(flatten)]
    rest: HashMap<String, Value>,
}

impl From<RawMeal> for MealPayload {
    fn from(mut raw: RawMeal) -> Self {
        let mut slots: [IngredientSlot; INGREDIENT_SLOTS] = Default::default();
        for (index, slot) in slots.iter_mut().enumerate() {
            let n = index + 1;
            slot.name = take_text(&mut raw.rest, &format!("strIngredient{n}"));
            slot.measure = take_text(&mut raw.rest, &format!("strMeasure{n}"));
        }

        MealPayload {
            id: raw.id,
            name: raw.name,
            thumbnail: raw.thumbnail,
            category: raw.category,
            area: raw.area,
            instructions: raw.instructions,
            youtube: raw.youtube,
            source: raw.source,
            tags: raw.tags,
            slots,
        }
    }
}

fn take_text(fields: &mut HashMap<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(text) => Some(text),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MealPayload {
    fn take_id(&mut self) -> Option<String> {
        non_blank(self.id.take())
    }

    /// Convert into a summary; `None` when the record has no id
    pub fn into_summary(mut self) -> Option<RecipeSummary> {
        let id = self.take_id()?;
        Some(RecipeSummary {
            id,
            name: self.name.unwrap_or_default(),
            thumbnail_url: non_blank(self.thumbnail),
            category: non_blank(self.category),
            area: non_blank(self.area),
        })
    }

    /// Convert into a detail record; `None` when the record has no id
    pub fn into_detail(mut self) -> Option<RecipeDetail> {
        let id = self.take_id()?;
        let ingredients = extract_ingredients(&self.slots);
        let tags = self
            .tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Some(RecipeDetail {
            id,
            name: self.name.unwrap_or_default(),
            thumbnail_url: non_blank(self.thumbnail),
            category: non_blank(self.category),
            area: non_blank(self.area),
            instructions: self.instructions.unwrap_or_default(),
            ingredients,
            video_url: non_blank(self.youtube),
            source_url: non_blank(self.source),
            tags,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPayload {
    #[serde(rename = "idCategory")]
    pub id: Option<String>,
    #[serde(rename = "strCategory")]
    pub name: Option<String>,
    #[serde(rename = "strCategoryThumb")]
    pub thumbnail: Option<String>,
    #[serde(rename = "strCategoryDescription")]
    pub description: Option<String>,
}

impl CategoryPayload {
    pub fn into_category(self) -> Option<Category> {
        let name = non_blank(self.name)?;
        Some(Category {
            id: non_blank(self.id).unwrap_or_else(|| name.clone()),
            name,
            thumbnail_url: non_blank(self.thumbnail),
            description: self.description.unwrap_or_default(),
        })
    }
}

/// Envelope of the filter, lookup and random endpoints.
///
/// TheMealDB answers "no results" with `"meals": null`; any non-array value
/// is read as an empty list.
#[derive(Debug, Default, Deserialize)]
pub struct MealsResponse {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub meals: Vec<MealPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub categories: Vec<CategoryPayload>,
}

fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        // A malformed record is dropped like one without an id
        Value::Array(items) => Ok(items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed record: {}", e);
                    None
                }
            })
            .collect()),
        _ => Ok(Vec::new()),
    }
}
