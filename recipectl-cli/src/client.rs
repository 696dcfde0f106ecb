//! HTTP client for a running recipectl server

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use recipectl_core::{Recipe, RecipeCreate, RecipeUpdate};

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// A listed recipe and where it came from
#[derive(Debug, Serialize, Deserialize)]
pub struct ListedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    /// `internal` or `external`
    #[serde(default)]
    pub source: String,
}

/// Response for GET /api/recipes
#[derive(Debug, Deserialize)]
struct RecipeList {
    recipes: Vec<ListedRecipe>,
}

/// Non-2xx reply from the server
#[derive(Debug, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

/// Thin wrapper over the recipe API
#[derive(Debug, Clone)]
pub struct RecipeClient {
    client: Client,
    base_url: Url,
}

impl RecipeClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid server URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid server URL: {}", base_url));
        }
        Ok(Self { client, base_url })
    }

    /// Base URL plus `segments`, each percent-encoded as one path segment
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<ListedRecipe>> {
        let mut request = self.client.get(self.url(&["api", "recipes"]));
        if let Some(query) = search {
            request = request.query(&[("search", query)]);
        }
        let response = request
            .send()
            .await
            .context("Failed to connect to recipe server")?;
        let list: RecipeList = handle_response(response).await?;
        Ok(list.recipes)
    }

    pub async fn get(&self, id: &str) -> Result<Recipe> {
        let response = self
            .client
            .get(self.url(&["api", "recipes", id]))
            .send()
            .await
            .context("Failed to connect to recipe server")?;
        handle_response(response).await
    }

    pub async fn create(&self, request: &RecipeCreate) -> Result<Recipe> {
        let response = self
            .client
            .post(self.url(&["api", "recipes"]))
            .json(request)
            .send()
            .await
            .context("Failed to connect to recipe server")?;
        handle_response(response).await
    }

    pub async fn update(&self, id: &str, request: &RecipeUpdate) -> Result<Recipe> {
        let response = self
            .client
            .put(self.url(&["api", "recipes", id]))
            .json(request)
            .send()
            .await
            .context("Failed to connect to recipe server")?;
        handle_response(response).await
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        response.json::<T>().await.context("Failed to parse response")
    } else {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = match serde_json::from_str::<ErrorResponse>(&error_text) {
            Ok(error_resp) => error_resp.message,
            Err(_) => error_text,
        };
        Err(ApiFailure { status, message }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_encoded_as_one_segment() {
        let client = RecipeClient::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(
            client.url(&["api", "recipes", "a/b?c#d"]).as_str(),
            "http://127.0.0.1:8000/api/recipes/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let client = RecipeClient::new("http://example.test/recipes-app/").unwrap();
        assert_eq!(
            client.url(&["api", "recipes"]).as_str(),
            "http://example.test/recipes-app/api/recipes"
        );
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        assert!(RecipeClient::new("not a url").is_err());
    }

    #[test]
    fn listed_recipe_keeps_source() {
        let listed: ListedRecipe = serde_json::from_value(serde_json::json!({
            "id": "external-52772",
            "title": "Casserole",
            "description": "Bake it",
            "ingredients": ["rice"],
            "instructions": ["Bake"],
            "tags": [],
            "cuisine": null,
            "source": "external",
            "image_url": null
        }))
        .unwrap();
        assert_eq!(listed.source, "external");
        assert_eq!(listed.recipe.id, "external-52772");
    }
}
