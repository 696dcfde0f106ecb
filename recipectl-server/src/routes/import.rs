//! Bulk import endpoint
//!
//! The whole body is checked before anything is stored: one bad item
//! rejects the import and the existing recipes are kept.

use std::sync::Arc;

use axum::{body::Body, extract::State, routing::post, Json, Router};
use serde::Serialize;
use serde_json::Value;

use recipectl_core::import::validate_recipes_for_import;

use crate::error::ApiError;
use crate::server::AppState;

/// Response for a successful import
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
    pub count: usize,
}

/// POST /api/recipes/import - replace all recipes with a JSON array
async fn import_recipes(
    State(state): State<Arc<AppState>>,
    body: Body,
) -> Result<Json<ImportResponse>, ApiError> {
    let max = state.max_import_bytes;
    let bytes = axum::body::to_bytes(body, max).await.map_err(|_| {
        ApiError::bad_request(format!("File too large. Maximum size is {} bytes.", max))
    })?;

    let data: Value = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON format: {}", e)))?;

    let Value::Array(items) = data else {
        return Err(ApiError::bad_request("JSON must be an array of recipes."));
    };

    let (valid, errors) = validate_recipes_for_import(&items, &state.limits);
    if !errors.is_empty() {
        tracing::info!(errors = errors.len(), "import rejected");
        return Err(ApiError::ImportRejected { errors });
    }

    let count = state.store.replace_all(valid).await;
    tracing::info!(count, "recipes imported");

    Ok(Json(ImportResponse {
        message: format!("Successfully imported {} recipes", count),
        count,
    }))
}

/// Import routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/recipes/import", post(import_recipes))
}
