//! Recipe discovery and parsing clients.
//!
//! Both clients follow the same shape: build a prompt, send it to the model,
//! strip code fences from the reply, and parse it as JSON. The reply is never
//! retried; a parse failure surfaces as [`DiscoveryError::BadModelJson`].
//!
//! The parsing client receives only the source URL and an optional title, not
//! the page content, so result fidelity depends entirely on what the model
//! knows about that URL.

use chrono::{SecondsFormat, Utc};

use crate::gemini::{strip_code_fences, ModelError, RecipeModel};
use crate::models::{HistoryEntry, ParsedRecipe, Recipe};
use crate::recipes::RecipeBook;

/// Errors from the discovery and parsing clients.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The model call itself failed.
    Model(ModelError),
    /// The model replied, but the text was not the expected JSON.
    BadModelJson(serde_json::Error),
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::Model(e) => write!(f, "{}", e),
            DiscoveryError::BadModelJson(e) => {
                write!(f, "Failed to parse model response as JSON: {}", e)
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::Model(e) => Some(e),
            DiscoveryError::BadModelJson(e) => Some(e),
        }
    }
}

impl From<ModelError> for DiscoveryError {
    fn from(e: ModelError) -> Self {
        DiscoveryError::Model(e)
    }
}

/// Asks the model for recipe suggestions matching the given ingredients.
///
/// Each returned recipe gets a locally synthesized `id`
/// (`recipe_<epoch-ms>_<index>`) and `created_at`; whatever the model put in
/// those fields is discarded. The search is appended to the history, but a
/// history write failure only logs a warning and never suppresses the result.
///
/// Callers must reject an empty ingredient list before calling; this function
/// assumes a non-empty slice.
pub async fn search_recipes(
    model: &dyn RecipeModel,
    book: &RecipeBook,
    ingredients: &[String],
) -> Result<Vec<Recipe>, DiscoveryError> {
    let prompt = build_search_prompt(ingredients);

    let text = model.generate(&prompt).await?;
    tracing::debug!(chars = text.len(), "Received model response");

    let cleaned = strip_code_fences(&text);
    let mut recipes: Vec<Recipe> =
        serde_json::from_str(&cleaned).map_err(DiscoveryError::BadModelJson)?;

    let now = Utc::now();
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let epoch_ms = now.timestamp_millis();
    for (index, recipe) in recipes.iter_mut().enumerate() {
        recipe.id = format!("recipe_{}_{}", epoch_ms, index);
        recipe.created_at = timestamp.clone();
    }

    let entry = HistoryEntry {
        search_ingredients: ingredients.to_vec(),
        recipes: recipes.clone(),
        timestamp,
    };
    if let Err(e) = book.append_history(entry) {
        tracing::warn!("Failed to record search in history: {}", e);
    }

    Ok(recipes)
}

/// Asks the model to extract a structured recipe from a source URL.
///
/// No history side effect, and no field-level validation beyond the JSON
/// shape: a structurally odd but parseable reply is returned as-is.
pub async fn parse_recipe(
    model: &dyn RecipeModel,
    source_url: &str,
    title: Option<&str>,
) -> Result<ParsedRecipe, DiscoveryError> {
    let prompt = build_parse_prompt(source_url, title);

    let text = model.generate(&prompt).await?;
    tracing::debug!(chars = text.len(), "Received model response");

    let cleaned = strip_code_fences(&text);
    serde_json::from_str(&cleaned).map_err(DiscoveryError::BadModelJson)
}

fn build_search_prompt(ingredients: &[String]) -> String {
    format!(
        r#"You are a recipe discovery assistant. The user has these ingredients available:
{}

Please find 6-8 highly rated, diverse recipes that can be made with these ingredients. For each recipe, provide:
1. Recipe name
2. Brief description (1 sentence)
3. Cooking time (e.g., "30 mins", "1 hour")
4. Number of servings
5. Source website URL (must be a real, working recipe URL)
6. An image URL (from the recipe page or food image site like Unsplash)
7. Rating (4.0 to 5.0)
8. List of main ingredients used from the user's list
9. Cuisine type (e.g., Italian, Asian, Mexican, etc.)
10. Difficulty level (Easy, Medium, Hard)

Return the response as a JSON array with this exact structure:
[
  {{
    "title": "Recipe Name",
    "description": "Brief description",
    "cookTime": "30 mins",
    "servings": "4",
    "sourceUrl": "https://example.com/recipe",
    "imageUrl": "https://example.com/image.jpg",
    "rating": "4.5",
    "ingredients": ["ingredient1", "ingredient2"],
    "cuisine": "Italian",
    "difficulty": "Easy"
  }}
]

Make sure to find REAL, existing recipes from popular cooking websites. Return ONLY valid JSON, no additional text."#,
        ingredients.join(", ")
    )
}

fn build_parse_prompt(source_url: &str, title: Option<&str>) -> String {
    format!(
        r#"You are a recipe parser. Please extract and clean up the recipe from this URL: {}

Recipe Title: {}

Please extract the following information and return it as clean, readable JSON:

1. Title
2. Description (brief overview)
3. Cooking time (e.g., "30 mins", "1 hour")
4. Number of servings
5. Ingredients list (as array of {{amount: string, item: string}})
6. Step-by-step instructions (as array of {{step: number, instruction: string}})
7. Optional cooking tips
8. Optional nutrition info (if available)

Return ONLY valid JSON in this exact format:
{{
  "title": "Recipe Name",
  "description": "Brief description",
  "cookTime": "30 mins",
  "servings": "4",
  "ingredients": [
    {{"amount": "2 cups", "item": "flour"}},
    {{"amount": "1 tsp", "item": "salt"}}
  ],
  "instructions": [
    {{"step": 1, "instruction": "Preheat oven to 350°F"}},
    {{"step": 2, "instruction": "Mix ingredients"}}
  ],
  "tips": ["tip1", "tip2"],
  "nutrition": {{
    "calories": "250",
    "protein": "10g",
    "carbs": "30g",
    "fat": "8g"
  }}
}}

Make the instructions clear, concise, and easy to follow. Return ONLY JSON, no additional text."#,
        source_url,
        title.unwrap_or("Unknown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CannedModel {
        reply: String,
        calls: AtomicUsize,
    }

    impl CannedModel {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RecipeModel for CannedModel {
        async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn setup_book() -> (RecipeBook, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let book = RecipeBook::new(DocumentStore::new(temp_dir.path()));
        (book, temp_dir)
    }

    const TWO_RECIPES: &str = r#"```json
[
  {"title": "Chicken Alfredo", "description": "Creamy pasta", "cookTime": "30 mins",
   "servings": "4", "sourceUrl": "https://example.com/alfredo",
   "imageUrl": "https://example.com/alfredo.jpg", "rating": "4.7",
   "ingredients": ["chicken", "pasta"], "cuisine": "Italian", "difficulty": "Easy",
   "id": "model_made_this_up", "createdAt": "1999-01-01T00:00:00Z"},
  {"title": "Chicken Stir Fry", "description": "Quick weeknight dinner",
   "cookTime": "20 mins", "servings": "2", "sourceUrl": "https://example.com/stirfry",
   "imageUrl": "https://example.com/stirfry.jpg", "rating": "4.5",
   "ingredients": ["chicken"], "cuisine": "Asian", "difficulty": "Medium"}
]
```"#;

    fn assert_synthesized_id(id: &str, index: usize) {
        let rest = id
            .strip_prefix("recipe_")
            .unwrap_or_else(|| panic!("id missing prefix: {}", id));
        let (millis, idx) = rest.split_once('_').expect("id missing index part");
        assert!(millis.chars().all(|c| c.is_ascii_digit()), "bad id: {}", id);
        assert_eq!(idx, index.to_string());
    }

    #[tokio::test]
    async fn test_search_parses_fenced_reply_and_assigns_ids() {
        let (book, _temp) = setup_book();
        let model = CannedModel::new(TWO_RECIPES);

        let ingredients = vec!["chicken".to_string(), "pasta".to_string()];
        let recipes = search_recipes(&model, &book, &ingredients).await.unwrap();

        assert_eq!(recipes.len(), 2);
        for (i, recipe) in recipes.iter().enumerate() {
            assert_synthesized_id(&recipe.id, i);
            assert!(!recipe.created_at.is_empty());
            assert_ne!(recipe.created_at, "1999-01-01T00:00:00Z");
        }
        assert_eq!(recipes[0].title, "Chicken Alfredo");
    }

    #[tokio::test]
    async fn test_search_logs_to_history() {
        let (book, _temp) = setup_book();
        let model = CannedModel::new(TWO_RECIPES);

        let ingredients = vec!["chicken".to_string(), "pasta".to_string()];
        search_recipes(&model, &book, &ingredients).await.unwrap();

        let history = book.list_history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].search_ingredients, ingredients);
        assert_eq!(history[0].recipes.len(), 2);
    }

    #[tokio::test]
    async fn test_search_rejects_non_json_reply() {
        let (book, _temp) = setup_book();
        let model = CannedModel::new("I'm sorry, I can't find any recipes today.");

        let ingredients = vec!["chicken".to_string()];
        let result = search_recipes(&model, &book, &ingredients).await;

        assert!(matches!(result, Err(DiscoveryError::BadModelJson(_))));
        // A failed search leaves no history entry behind.
        assert!(book.list_history().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_parse_recipe_no_history_side_effect() {
        let (book, _temp) = setup_book();
        let model = CannedModel::new(
            r#"```json
{"title": "Pancakes", "description": "Fluffy", "cookTime": "20 mins", "servings": "4",
 "ingredients": [{"amount": "2 cups", "item": "flour"}],
 "instructions": [{"step": 1, "instruction": "Mix"}]}
```"#,
        );

        let recipe = parse_recipe(&model, "https://example.com/pancakes", Some("Pancakes"))
            .await
            .unwrap();

        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert!(book.list_history().unwrap().is_empty());
    }

    #[test]
    fn test_search_prompt_includes_ingredients() {
        let prompt = build_search_prompt(&["chicken".to_string(), "rice".to_string()]);
        assert!(prompt.contains("chicken, rice"));
        assert!(prompt.contains("6-8"));
        assert!(prompt.contains("Return ONLY valid JSON"));
    }

    #[test]
    fn test_parse_prompt_defaults_title_to_unknown() {
        let prompt = build_parse_prompt("https://example.com/r", None);
        assert!(prompt.contains("https://example.com/r"));
        assert!(prompt.contains("Recipe Title: Unknown"));
    }
}
