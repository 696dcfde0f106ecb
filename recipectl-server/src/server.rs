//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Optional seeding from a recipe JSON file
//! - Optional external recipe source
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use recipectl_core::config::DEFAULT_MAX_IMPORT_BYTES;
use recipectl_core::import::{read_recipe_array, validate_recipes_for_import};
use recipectl_core::{RecipeError, RecipeLimits};

use crate::external::{ExternalRecipeSource, MealDbSource};
use crate::routes;
use crate::store::RecipeStore;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    pub cors_permissive: bool,

    /// Limits enforced on create, update and import
    pub limits: RecipeLimits,

    /// Largest accepted import body in bytes
    pub max_import_bytes: usize,

    /// Recipes loaded at startup, if the file exists
    pub seed_file: Option<PathBuf>,

    /// TheMealDB base URL; `None` keeps the API local-only
    pub external_api_url: Option<String>,

    /// Per-request timeout for the external source
    pub external_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_permissive: false,
            limits: RecipeLimits::default(),
            max_import_bytes: DEFAULT_MAX_IMPORT_BYTES,
            seed_file: None,
            external_api_url: None,
            external_timeout: Duration::from_secs(10),
        }
    }
}

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    pub store: RecipeStore,
    pub limits: RecipeLimits,
    pub max_import_bytes: usize,
    /// Consulted by search and by id lookups that miss the store
    pub external: Option<Arc<dyn ExternalRecipeSource>>,
}

impl AppState {
    pub fn new(limits: RecipeLimits, max_import_bytes: usize) -> Self {
        Self {
            store: RecipeStore::new(),
            limits,
            max_import_bytes,
            external: None,
        }
    }

    pub fn with_external_source(mut self, source: Arc<dyn ExternalRecipeSource>) -> Self {
        self.external = Some(source);
        self
    }

    /// State for `config`, connecting the external source when one is set.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let state = Self::new(config.limits, config.max_import_bytes);
        match &config.external_api_url {
            Some(url) => {
                let source = MealDbSource::new(url, config.external_timeout)?;
                tracing::info!(url = %url, "external recipe source enabled");
                Ok(state.with_external_source(Arc::new(source)))
            }
            None => Ok(state),
        }
    }
}

/// Build the application router with all routes
pub fn build_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        // Localhost only
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:8000"),
                HeaderValue::from_static("http://127.0.0.1:8000"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::recipes::router())
        .merge(routes::import::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load recipes from a JSON file into the store.
///
/// Invalid items are logged and skipped; the rest are imported.
pub async fn seed_from_file(state: &AppState, path: &Path) -> Result<usize, ServerError> {
    let items = read_recipe_array(path)?;

    let (valid, errors) = validate_recipes_for_import(&items, &state.limits);
    for e in &errors {
        tracing::warn!(
            index = e.index,
            id = %e.recipe_id,
            loc = %e.loc.join("."),
            "skipping seed recipe: {}",
            e.msg
        );
    }

    Ok(state.store.replace_all(valid).await)
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let config = ServerConfig::default();
/// run_server(config).await?;
/// ```
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState::from_config(&config)?);

    if let Some(path) = &config.seed_file {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No sample data file found");
        } else {
            match seed_from_file(&state, path).await {
                Ok(count) => tracing::info!("Seeded {} recipes from {}", count, path.display()),
                Err(e) => tracing::warn!("Failed to seed sample data: {}", e),
            }
        }
    }

    let app = build_router(state, config.cors_permissive);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Recipes(#[from] RecipeError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
