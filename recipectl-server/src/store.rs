//! In-memory recipe store
//!
//! Recipes are kept in insertion order behind a tokio `RwLock`. Locks are
//! held only for the duration of a single operation.

use std::collections::HashSet;

use tokio::sync::RwLock;

use recipectl_core::{Recipe, RecipeCreate, RecipeUpdate};

#[derive(Debug, Default)]
pub struct RecipeStore {
    recipes: RwLock<Vec<Recipe>>,
}

impl RecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recipes in insertion order
    pub async fn list(&self) -> Vec<Recipe> {
        self.recipes.read().await.clone()
    }

    /// Recipes whose title contains `query` (case-insensitive)
    pub async fn search(&self, query: &str) -> Vec<Recipe> {
        self.recipes
            .read()
            .await
            .iter()
            .filter(|r| r.title_matches(query))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.recipes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn get(&self, id: &str) -> Option<Recipe> {
        self.recipes.read().await.iter().find(|r| r.id == id).cloned()
    }

    pub async fn create(&self, input: RecipeCreate) -> Recipe {
        let recipe = Recipe::create(input);
        self.recipes.write().await.push(recipe.clone());
        tracing::debug!(id = %recipe.id, "recipe created");
        recipe
    }

    /// Replace a recipe's fields. Returns `None` if the id is unknown.
    pub async fn update(&self, id: &str, update: RecipeUpdate) -> Option<Recipe> {
        let mut recipes = self.recipes.write().await;
        let recipe = recipes.iter_mut().find(|r| r.id == id)?;
        recipe.apply_update(update);
        Some(recipe.clone())
    }

    pub async fn delete(&self, id: &str) -> bool {
        let mut recipes = self.recipes.write().await;
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        recipes.len() < before
    }

    /// Drop everything and load `recipes`. Duplicate ids after the first are skipped.
    pub async fn replace_all(&self, recipes: Vec<Recipe>) -> usize {
        let mut seen = HashSet::new();
        let unique: Vec<Recipe> = recipes
            .into_iter()
            .filter(|r| {
                let fresh = seen.insert(r.id.clone());
                if !fresh {
                    tracing::warn!(id = %r.id, "skipping duplicate recipe id");
                }
                fresh
            })
            .collect();

        let count = unique.len();
        *self.recipes.write().await = unique;
        count
    }
}
