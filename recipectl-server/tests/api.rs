//! Router-level tests for the recipe API

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use recipectl_core::RecipeLimits;
use recipectl_server::external::transform_meal;
use recipectl_server::{build_router, AppState, ExternalRecipe, ExternalRecipeSource};

fn app() -> Router {
    app_with(RecipeLimits::default(), 1_000_000)
}

fn app_with(limits: RecipeLimits, max_import_bytes: usize) -> Router {
    build_router(Arc::new(AppState::new(limits, max_import_bytes)), false)
}

/// Fixed external catalogue with one meal
#[derive(Debug)]
struct StubSource;

impl StubSource {
    fn meal() -> ExternalRecipe {
        let meal = json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "1. Preheat oven.\r\n2. Bake.",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup"
        });
        transform_meal(meal.as_object().unwrap())
    }
}

#[async_trait]
impl ExternalRecipeSource for StubSource {
    async fn search(&self, query: &str) -> Vec<ExternalRecipe> {
        if "teriyaki chicken casserole".contains(&query.to_lowercase()) {
            vec![Self::meal()]
        } else {
            Vec::new()
        }
    }

    async fn lookup(&self, id: &str) -> Option<ExternalRecipe> {
        (id == "52772").then(Self::meal)
    }
}

fn app_with_external() -> Router {
    let state = AppState::new(RecipeLimits::default(), 1_000_000)
        .with_external_source(Arc::new(StubSource));
    build_router(Arc::new(state), false)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn sample_recipe() -> Value {
    json!({
        "title": "Test Recipe",
        "description": "A test recipe",
        "ingredients": ["ingredient 1", "ingredient 2"],
        "instructions": ["First, do step 1.", "Then, do step 2."],
        "tags": ["test"],
        "cuisine": "Test Cuisine"
    })
}

fn import_item() -> Value {
    json!({
        "id": "import-test-001",
        "title": "Imported Recipe",
        "description": "An imported test recipe",
        "ingredients": ["flour", "water"],
        "instructions": ["Mix ingredients", "Bake"],
        "tags": ["imported"],
        "cuisine": "Test",
        "created_at": "2024-01-01T00:00:00",
        "updated_at": "2024-01-01T00:00:00"
    })
}

#[tokio::test]
async fn health_check() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["recipes"], 0);

    send(&app, "POST", "/api/recipes", Some(sample_recipe())).await;
    let (_, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(body["recipes"], 1);
}

#[tokio::test]
async fn list_starts_empty() {
    let (status, body) = send(&app(), "GET", "/api/recipes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipes"], json!([]));
}

#[tokio::test]
async fn create_and_get_recipe() {
    let app = app();
    let (status, created) = send(&app, "POST", "/api/recipes", Some(sample_recipe())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["title"], "Test Recipe");
    assert!(created["created_at"].is_string());

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/recipes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["source"], "internal");
    assert_eq!(
        fetched["instructions"],
        json!(["First, do step 1.", "Then, do step 2."])
    );
}

#[tokio::test]
async fn recipe_not_found() {
    let app = app();
    let (status, _) = send(&app, "GET", "/api/recipes/non-existent-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/recipes/non-existent-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/recipes/non-existent-id",
        Some(sample_recipe()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn server_enforces_ingredient_cap() {
    let app = app_with(
        RecipeLimits {
            max_ingredients: 20,
            ..RecipeLimits::default()
        },
        1_000_000,
    );
    let mut recipe = sample_recipe();
    recipe["ingredients"] = json!(vec!["salt"; 21]);

    let (status, body) = send(&app, "POST", "/api/recipes", Some(recipe.clone())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "ingredients");

    recipe["ingredients"] = json!(vec!["salt"; 20]);
    let (status, _) = send(&app, "POST", "/api/recipes", Some(recipe)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn empty_instructions_are_rejected() {
    let mut recipe = sample_recipe();
    recipe["instructions"] = json!([]);
    let (status, body) = send(&app(), "POST", "/api/recipes", Some(recipe)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "instructions");
}

#[tokio::test]
async fn update_replaces_fields_in_order() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/recipes", Some(sample_recipe())).await;
    let id = created["id"].as_str().unwrap();

    let mut update = sample_recipe();
    update["title"] = json!("Updated");
    update["instructions"] = json!(["c", "a", "b"]);
    let (status, updated) = send(&app, "PUT", &format!("/api/recipes/{id}"), Some(update)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Updated");
    assert_eq!(updated["instructions"], json!(["c", "a", "b"]));
    assert_eq!(updated["created_at"], created["created_at"]);
}

#[tokio::test]
async fn delete_then_gone() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/recipes", Some(sample_recipe())).await;
    let uri = format!("/api/recipes/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_filters_by_title() {
    let app = app();
    send(&app, "POST", "/api/recipes", Some(sample_recipe())).await;
    let mut other = sample_recipe();
    other["title"] = json!("Pancakes");
    send(&app, "POST", "/api/recipes", Some(other)).await;

    let (_, body) = send(&app, "GET", "/api/recipes?search=pancake", None).await;
    let recipes = body["recipes"].as_array().unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["title"], "Pancakes");

    let (_, body) = send(&app, "GET", "/api/recipes?search=", None).await;
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn import_replaces_and_export_round_trips() {
    let app = app();
    send(&app, "POST", "/api/recipes", Some(sample_recipe())).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/recipes/import",
        Some(json!([import_item()])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["message"], "Successfully imported 1 recipes");

    let (status, exported) = send(&app, "GET", "/api/recipes/export", None).await;
    assert_eq!(status, StatusCode::OK);
    let exported = exported.as_array().unwrap();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0]["id"], "import-test-001");
    assert_eq!(exported[0]["created_at"], "2024-01-01T00:00:00");
}

#[tokio::test]
async fn import_migrates_legacy_items() {
    let app = app();
    let mut legacy = import_item();
    legacy["instructions"] = json!("Mix.\n\nBake.");
    legacy["difficulty"] = json!("Easy");

    let (status, _) = send(&app, "POST", "/api/recipes/import", Some(json!([legacy]))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, recipe) = send(&app, "GET", "/api/recipes/import-test-001", None).await;
    assert_eq!(recipe["instructions"], json!(["Mix.", "Bake."]));
    assert!(recipe.get("difficulty").is_none());
}

#[tokio::test]
async fn import_rejects_bad_json_and_non_arrays() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/recipes/import")
        .body(Body::from("[{not json"))
        .unwrap();
    let (status, body) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON format"));

    let (status, body) = send(&app, "POST", "/api/recipes/import", Some(import_item())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "JSON must be an array of recipes.");
}

#[tokio::test]
async fn import_rejects_oversized_body() {
    let app = app_with(RecipeLimits::default(), 64);
    let (status, body) = send(
        &app,
        "POST",
        "/api/recipes/import",
        Some(json!([import_item()])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("File too large"));
}

#[tokio::test]
async fn import_with_schema_errors_keeps_existing_recipes() {
    let app = app();
    send(&app, "POST", "/api/recipes", Some(sample_recipe())).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/recipes/import",
        Some(json!([import_item(), { "id": "x-1", "title": "Half" }])),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Recipe schema validation failed");
    let errors = body["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .all(|e| e["index"] == 1 && e["recipe_id"] == "x-1" && e["recipe_title"] == "Half"));
    assert!(errors.iter().any(|e| e["type"] == "missing"));

    let (_, list) = send(&app, "GET", "/api/recipes", None).await;
    assert_eq!(list["recipes"].as_array().unwrap().len(), 1);
    assert_eq!(list["recipes"][0]["title"], "Test Recipe");
}

#[tokio::test]
async fn incomplete_create_body_gets_json_error() {
    let (status, body) = send(&app(), "POST", "/api/recipes", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_body");
    assert!(body["message"].as_str().unwrap().contains("description"));
}

#[tokio::test]
async fn malformed_update_body_gets_json_error() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/recipes", Some(sample_recipe())).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/recipes/{}", created["id"].as_str().unwrap()))
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();

    let (status, body) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn missing_content_type_gets_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/recipes")
        .body(Body::from(sample_recipe().to_string()))
        .unwrap();

    let (status, body) = send_request(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn search_merges_external_results_after_internal() {
    let app = app_with_external();
    let mut local = sample_recipe();
    local["title"] = json!("Chicken Soup");
    send(&app, "POST", "/api/recipes", Some(local)).await;

    let (status, body) = send(&app, "GET", "/api/recipes?search=chicken", None).await;
    assert_eq!(status, StatusCode::OK);
    let recipes = body["recipes"].as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["source"], "internal");
    assert_eq!(recipes[1]["source"], "external");
    assert_eq!(recipes[1]["id"], "external-52772");
    assert_eq!(recipes[1]["instructions"], json!(["Preheat oven.", "Bake."]));

    // Plain listing stays local
    let (_, body) = send(&app, "GET", "/api/recipes", None).await;
    assert_eq!(body["recipes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn id_lookup_falls_back_to_external() {
    let app = app_with_external();

    for uri in [
        "/api/recipes/external-52772",
        "/api/recipes/52772",
        "/api/recipes/external/52772",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["title"], "Teriyaki Chicken Casserole");
        assert_eq!(body["ingredients"], json!(["3/4 cup soy sauce"]));
        assert_eq!(body["tags"], json!(["Chicken"]));
    }

    let (status, _) = send(&app, "GET", "/api/recipes/internal/external-52772", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/recipes/external-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn internal_route_serves_stored_recipes() {
    let app = app_with_external();
    let (_, created) = send(&app, "POST", "/api/recipes", Some(sample_recipe())).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/recipes/internal/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "internal");

    // No external source configured
    let (status, _) = send(&crate::app(), "GET", "/api/recipes/external/52772", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
