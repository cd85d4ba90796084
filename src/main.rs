//! PantryChef server binary.
//!
//! Serves the ingredient catalog, recipe discovery, history, and favorites
//! API. See [`pantrychef::config`] for the environment variables it reads.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pantrychef::catalog::IngredientCatalog;
use pantrychef::config::Config;
use pantrychef::gemini::{GeminiClient, RecipeModel};
use pantrychef::recipes::RecipeBook;
use pantrychef::server::{self, AppState};
use pantrychef::store::DocumentStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pantrychef=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load(None) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        tracing::error!(
            "Failed to create data directory {}: {}",
            config.data_dir.display(),
            e
        );
        std::process::exit(1);
    }
    tracing::info!("Data directory: {}", config.data_dir.display());

    let model: Option<Arc<dyn RecipeModel>> = match config.usable_api_key() {
        Some(key) => {
            tracing::info!("Using Gemini model: {}", config.gemini_model);
            Some(Arc::new(GeminiClient::new(key, &config.gemini_model)))
        }
        None => {
            tracing::warn!(
                "GEMINI_API_KEY not configured; recipe search and parse will return errors"
            );
            None
        }
    };

    let store = DocumentStore::new(&config.data_dir);
    let state = AppState {
        catalog: IngredientCatalog::new(store.clone()),
        recipes: RecipeBook::new(store),
        model,
    };

    let app = server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
