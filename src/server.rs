//! HTTP surface: router, handlers, and the error envelope.
//!
//! Every response is a JSON envelope. Successes carry `success: true` plus
//! the payload; failures are rendered by [`ApiError`] as
//! `{"success": false, "error": "<message>"}` with the status code matching
//! the error kind.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::catalog::{CatalogError, IngredientCatalog};
use crate::discovery::{self, DiscoveryError};
use crate::gemini::RecipeModel;
use crate::models::{HistoryEntry, ParsedRecipe, Recipe};
use crate::recipes::RecipeBook;
use crate::store::StoreError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: IngredientCatalog,
    pub recipes: RecipeBook,
    /// The generative model, or None when no API key is configured. Search
    /// and parse requests fail with a configuration error in that case.
    pub model: Option<Arc<dyn RecipeModel>>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/ingredients",
            get(list_ingredients)
                .post(add_ingredient)
                .delete(remove_ingredient),
        )
        .route(
            "/api/recipes/favorite",
            get(list_favorites).post(toggle_favorite),
        )
        .route(
            "/api/recipes/history",
            get(list_history).delete(clear_history),
        )
        .route("/api/recipes/search", post(search_recipes))
        .route("/api/recipes/parse", post(parse_recipe))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Errors
// ============================================================================

/// Request failures, translated to status codes at the boundary.
#[derive(Debug)]
pub enum ApiError {
    /// Bad or missing input (400).
    Validation(String),
    /// No matching resource (404).
    NotFound(String),
    /// Missing or placeholder model credential (500).
    Configuration(String),
    /// Document read/write/parse failure (500).
    Storage(String),
    /// The model call itself failed (500).
    Model(String),
    /// The model replied with non-JSON or malformed content (500).
    ResponseFormat(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Configuration(_)
            | ApiError::Storage(_)
            | ApiError::Model(_)
            | ApiError::ResponseFormat(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Configuration(msg)
            | ApiError::Storage(msg)
            | ApiError::Model(msg)
            | ApiError::ResponseFormat(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Invalid(msg) => ApiError::Validation(msg),
            CatalogError::NotFound => ApiError::NotFound("Ingredient not found".to_string()),
            CatalogError::Store(e) => ApiError::Storage(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Storage(e.to_string())
    }
}

impl From<DiscoveryError> for ApiError {
    fn from(e: DiscoveryError) -> Self {
        match e {
            DiscoveryError::Model(e) => ApiError::Model(e.to_string()),
            DiscoveryError::BadModelJson(_) => {
                ApiError::ResponseFormat("Failed to parse AI response".to_string())
            }
        }
    }
}

/// Failure envelope.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(%status, "Request failed: {}", message);
        } else {
            tracing::warn!(%status, "Request rejected: {}", message);
        }

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct IngredientListResponse {
    success: bool,
    ingredients: Vec<String>,
}

async fn list_ingredients(
    State(state): State<AppState>,
) -> Result<Json<IngredientListResponse>, ApiError> {
    let ingredients = state.catalog.list()?;
    Ok(Json(IngredientListResponse {
        success: true,
        ingredients,
    }))
}

#[derive(Serialize)]
struct IngredientMutationResponse {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ingredient: Option<String>,
}

/// Pulls a required string field out of a JSON request body.
fn required_str<'a>(body: &'a Value, field: &str, error: &str) -> Result<&'a str, ApiError> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation(error.to_string()))
}

async fn add_ingredient(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<IngredientMutationResponse>, ApiError> {
    let raw = required_str(&body, "ingredient", "Invalid ingredient provided")?;

    let outcome = state.catalog.add(raw)?;
    let message = if outcome.already_existed {
        "Ingredient already exists"
    } else {
        "Ingredient added successfully"
    };

    Ok(Json(IngredientMutationResponse {
        success: true,
        message,
        ingredient: Some(outcome.ingredient),
    }))
}

async fn remove_ingredient(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<IngredientMutationResponse>, ApiError> {
    let raw = required_str(&body, "ingredient", "Invalid ingredient provided")?;

    state.catalog.remove(raw)?;

    Ok(Json(IngredientMutationResponse {
        success: true,
        message: "Ingredient removed successfully",
        ingredient: None,
    }))
}

#[derive(Serialize)]
struct FavoritesResponse {
    success: bool,
    favorites: Vec<String>,
}

async fn list_favorites(
    State(state): State<AppState>,
) -> Result<Json<FavoritesResponse>, ApiError> {
    let favorites = state.recipes.list_favorites()?;
    Ok(Json(FavoritesResponse {
        success: true,
        favorites,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleFavoriteResponse {
    success: bool,
    is_favorited: bool,
}

async fn toggle_favorite(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ToggleFavoriteResponse>, ApiError> {
    let recipe_id = required_str(&body, "recipeId", "Recipe ID is required")?;

    let is_favorited = state.recipes.toggle_favorite(recipe_id)?;

    Ok(Json(ToggleFavoriteResponse {
        success: true,
        is_favorited,
    }))
}

#[derive(Serialize)]
struct HistoryResponse {
    success: bool,
    history: Vec<HistoryEntry>,
}

async fn list_history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, ApiError> {
    let history = state.recipes.list_history()?;
    Ok(Json(HistoryResponse {
        success: true,
        history,
    }))
}

#[derive(Serialize)]
struct ClearHistoryResponse {
    success: bool,
}

async fn clear_history(
    State(state): State<AppState>,
) -> Result<Json<ClearHistoryResponse>, ApiError> {
    state.recipes.clear_history()?;
    Ok(Json(ClearHistoryResponse { success: true }))
}

#[derive(Serialize)]
struct SearchResponse {
    success: bool,
    recipes: Vec<Recipe>,
}

async fn search_recipes(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SearchResponse>, ApiError> {
    let ingredients: Vec<String> = body
        .get("ingredients")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    if ingredients.is_empty() {
        return Err(ApiError::Validation(
            "Please provide at least one ingredient".to_string(),
        ));
    }

    let model = require_model(&state)?;
    tracing::info!(count = ingredients.len(), "Recipe search request");

    let recipes = discovery::search_recipes(model, &state.recipes, &ingredients).await?;

    Ok(Json(SearchResponse {
        success: true,
        recipes,
    }))
}

#[derive(Serialize)]
struct ParseResponse {
    success: bool,
    recipe: ParsedRecipe,
}

async fn parse_recipe(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ParseResponse>, ApiError> {
    let source_url = required_str(&body, "sourceUrl", "Source URL is required")?;
    let title = body.get("title").and_then(Value::as_str);

    let model = require_model(&state)?;
    tracing::info!(url = source_url, "Recipe parse request");

    let recipe = discovery::parse_recipe(model, source_url, title).await?;

    Ok(Json(ParseResponse {
        success: true,
        recipe,
    }))
}

/// The configuration check happens here, before any model work.
fn require_model(state: &AppState) -> Result<&dyn RecipeModel, ApiError> {
    state.model.as_deref().ok_or_else(|| {
        ApiError::Configuration(
            "Gemini API key not configured. Set GEMINI_API_KEY in the environment".to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("missing".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Configuration("no key".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Storage("io".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ResponseFormat("not json".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_catalog_error_conversion() {
        let err: ApiError = CatalogError::NotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = CatalogError::Invalid("too short".into()).into();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_required_str() {
        let body = serde_json::json!({"ingredient": "basil", "empty": "", "num": 7});

        assert_eq!(
            required_str(&body, "ingredient", "missing").unwrap(),
            "basil"
        );
        assert!(required_str(&body, "empty", "missing").is_err());
        assert!(required_str(&body, "num", "missing").is_err());
        assert!(required_str(&body, "absent", "missing").is_err());
    }
}
