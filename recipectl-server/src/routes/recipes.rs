//! Recipe CRUD endpoints
//!
//! Title searches and id lookups that miss the store also ask the
//! external source when one is configured.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use recipectl_core::{Recipe, RecipeCreate, RecipeUpdate};

use crate::error::ApiError;
use crate::external::{ExternalRecipe, EXTERNAL_ID_PREFIX};
use crate::extractors::ValidJson;
use crate::server::AppState;

/// Where a listed recipe came from
const SOURCE_INTERNAL: &str = "internal";

/// Query parameters for GET /api/recipes
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

/// Recipe with its source tag
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub source: &'static str,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            recipe,
            source: SOURCE_INTERNAL,
        }
    }
}

/// A recipe from either source
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SourcedRecipe {
    Internal(RecipeResponse),
    External(ExternalRecipe),
}

impl From<Recipe> for SourcedRecipe {
    fn from(recipe: Recipe) -> Self {
        Self::Internal(recipe.into())
    }
}

/// Response for GET /api/recipes
#[derive(Debug, Serialize)]
pub struct RecipeList {
    pub recipes: Vec<SourcedRecipe>,
}

/// Response for DELETE /api/recipes/{id}
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// GET /api/recipes - all recipes, or a title search across both sources
async fn list_recipes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<RecipeList> {
    let query = params.search.as_deref().map(str::trim).unwrap_or("");
    if query.is_empty() {
        let recipes = state.store.list().await;
        return Json(RecipeList {
            recipes: recipes.into_iter().map(SourcedRecipe::from).collect(),
        });
    }

    let mut recipes: Vec<SourcedRecipe> = state
        .store
        .search(query)
        .await
        .into_iter()
        .map(SourcedRecipe::from)
        .collect();

    if let Some(external) = &state.external {
        let found = external.search(query).await;
        tracing::debug!(query = %query, external = found.len(), "merged external results");
        recipes.extend(found.into_iter().map(SourcedRecipe::External));
    }

    Json(RecipeList { recipes })
}

/// POST /api/recipes - create a recipe
async fn create_recipe(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<RecipeCreate>,
) -> Result<Json<Recipe>, ApiError> {
    req.validate(&state.limits)?;
    let recipe = state.store.create(req).await;
    tracing::info!(id = %recipe.id, title = %recipe.title, "recipe created");
    Ok(Json(recipe))
}

async fn lookup_external(state: &AppState, id: &str) -> Option<ExternalRecipe> {
    match &state.external {
        Some(external) => external.lookup(id).await,
        None => None,
    }
}

/// GET /api/recipes/{id} - the store first, then the external source
async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SourcedRecipe>, ApiError> {
    if let Some(recipe) = state.store.get(&id).await {
        return Ok(Json(recipe.into()));
    }

    let external_id = id.strip_prefix(EXTERNAL_ID_PREFIX).unwrap_or(&id);
    lookup_external(&state, external_id)
        .await
        .map(|recipe| Json(SourcedRecipe::External(recipe)))
        .ok_or_else(|| ApiError::recipe_not_found(&id))
}

/// GET /api/recipes/internal/{id} - the store only
async fn get_internal_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let recipe = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| ApiError::recipe_not_found(&id))?;
    Ok(Json(recipe.into()))
}

/// GET /api/recipes/external/{id} - the external source only, by meal id
async fn get_external_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ExternalRecipe>, ApiError> {
    lookup_external(&state, &id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::recipe_not_found(&id))
}

/// PUT /api/recipes/{id} - replace a recipe's fields
async fn update_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<RecipeUpdate>,
) -> Result<Json<Recipe>, ApiError> {
    req.validate(&state.limits)?;
    let recipe = state
        .store
        .update(&id, req)
        .await
        .ok_or_else(|| ApiError::recipe_not_found(&id))?;
    tracing::info!(id = %recipe.id, "recipe updated");
    Ok(Json(recipe))
}

/// DELETE /api/recipes/{id}
async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.store.delete(&id).await {
        return Err(ApiError::recipe_not_found(&id));
    }
    tracing::info!(id = %id, "recipe deleted");
    Ok(Json(DeleteResponse {
        message: "Recipe deleted successfully",
        status: "success",
    }))
}

/// GET /api/recipes/export - every recipe as a bare JSON array
async fn export_recipes(State(state): State<Arc<AppState>>) -> Json<Vec<Recipe>> {
    Json(state.store.list().await)
}

/// Recipe routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route("/api/recipes/export", get(export_recipes))
        .route("/api/recipes/internal/{id}", get(get_internal_recipe))
        .route("/api/recipes/external/{id}", get(get_external_recipe))
        .route(
            "/api/recipes/{id}",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}
