//! Domain types shared across the services and the HTTP surface.
//!
//! All types serialize with the camelCase field names the front end and the
//! on-disk documents use. Recipes coming back from the generative model are
//! parsed leniently: every scalar except `title` defaults to empty when the
//! model omits it.

use serde::{Deserialize, Serialize};

/// Root of `ingredients.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientsDoc {
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// Root of `recipes.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipesDoc {
    /// Favorited recipe ids, in insertion order. Ids are not checked against
    /// any recipe table; a favorite can outlive the recipe it names.
    #[serde(default)]
    pub favorites: Vec<String>,
    /// Past searches, oldest first, capped at [`crate::recipes::HISTORY_CAP`].
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// One recorded recipe search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub search_ingredients: Vec<String>,
    pub recipes: Vec<Recipe>,
    /// ISO-8601 timestamp of the search.
    pub timestamp: String,
}

/// A recipe suggestion produced by the discovery client.
///
/// `id` and `created_at` are always assigned locally; whatever the model
/// returned for them is discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub servings: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// A structured recipe extracted from a source URL by the parsing client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRecipe {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub servings: String,
    #[serde(default)]
    pub ingredients: Vec<ParsedIngredient>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

/// One ingredient line of a parsed recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedIngredient {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub item: String,
}

/// One numbered instruction of a parsed recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(default)]
    pub step: u32,
    #[serde(default)]
    pub instruction: String,
}

/// Optional nutrition facts of a parsed recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<String>,
}
