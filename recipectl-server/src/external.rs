//! External recipe lookup (TheMealDB)
//!
//! Meals are converted to the recipe layout on the way in. Network and
//! decode failures are logged and degrade to "no results" so the internal
//! API keeps working when the remote service is down.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Source tag on recipes that came from the external service
pub const SOURCE_EXTERNAL: &str = "external";

/// Prefix that marks an external recipe id
pub const EXTERNAL_ID_PREFIX: &str = "external-";

/// Meals carry at most this many ingredient/measure pairs
const MAX_MEAL_INGREDIENTS: usize = 20;

const NO_INSTRUCTIONS: &str = "No instructions provided.";

/// Recipe converted from an external meal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalRecipe {
    /// `external-<meal id>`
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    pub cuisine: Option<String>,
    pub source: &'static str,
    pub image_url: Option<String>,
    pub external_id: String,
}

/// Read-only recipe provider outside the local store
#[async_trait]
pub trait ExternalRecipeSource: Send + Sync + fmt::Debug {
    /// Meals whose name matches `query`; empty on any failure.
    async fn search(&self, query: &str) -> Vec<ExternalRecipe>;

    /// One meal by its external id (without the `external-` prefix).
    async fn lookup(&self, id: &str) -> Option<ExternalRecipe>;
}

/// Trimmed, non-empty text of a meal field. Numbers are accepted too.
fn text(meal: &Map<String, Value>, key: &str) -> Option<String> {
    let raw = match meal.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!raw.is_empty()).then_some(raw)
}

fn build_ingredients(meal: &Map<String, Value>) -> Vec<String> {
    (1..=MAX_MEAL_INGREDIENTS)
        .filter_map(|i| {
            let ingredient = text(meal, &format!("strIngredient{}", i))?;
            Some(match text(meal, &format!("strMeasure{}", i)) {
                Some(measure) => format!("{} {}", measure, ingredient),
                None => ingredient,
            })
        })
        .collect()
}

/// Drop a leading step number such as `1. ` or `2) `.
fn strip_step_number(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }
    match rest.strip_prefix(['.', ')']) {
        Some(after) => after.trim_start(),
        None => line,
    }
}

fn build_instructions(meal: &Map<String, Value>) -> Vec<String> {
    let raw = match meal.get("strInstructions") {
        Some(Value::String(s)) if !s.is_empty() => s.as_str(),
        _ => return vec![NO_INSTRUCTIONS.to_string()],
    };

    let steps: Vec<String> = raw
        .replace("\r\n", "\n")
        .split('\n')
        .map(|line| strip_step_number(line.trim()))
        .filter(|step| !step.is_empty())
        .map(str::to_string)
        .collect();

    if steps.is_empty() {
        vec![raw.to_string()]
    } else {
        steps
    }
}

fn build_tags(meal: &Map<String, Value>) -> Vec<String> {
    let mut tags: Vec<String> = text(meal, "strTags")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    tags.extend(text(meal, "strCategory"));
    tags
}

/// Convert a TheMealDB meal object into an [`ExternalRecipe`].
pub fn transform_meal(meal: &Map<String, Value>) -> ExternalRecipe {
    let meal_id = text(meal, "idMeal").unwrap_or_default();
    let title = text(meal, "strMeal").unwrap_or_else(|| "Untitled".to_string());
    let instructions = build_instructions(meal);

    let mut description = instructions.first().cloned().unwrap_or_default();
    if instructions.len() > 1 && description.chars().count() > 100 {
        description.push_str("...");
    }
    if description.is_empty() {
        description = title.clone();
    }

    ExternalRecipe {
        id: format!("{}{}", EXTERNAL_ID_PREFIX, meal_id),
        title,
        description,
        ingredients: build_ingredients(meal),
        instructions,
        tags: build_tags(meal),
        cuisine: text(meal, "strArea"),
        source: SOURCE_EXTERNAL,
        image_url: text(meal, "strMealThumb"),
        external_id: meal_id,
    }
}

/// Body of search.php and lookup.php
#[derive(Debug, Deserialize)]
struct MealsResponse {
    meals: Option<Vec<Value>>,
}

/// TheMealDB over HTTP
#[derive(Debug, Clone)]
pub struct MealDbSource {
    client: Client,
    base_url: String,
}

impl MealDbSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, endpoint: &str, param: (&str, &str)) -> Result<Vec<Value>, reqwest::Error> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&[param])
            .send()
            .await?
            .error_for_status()?;
        let body: MealsResponse = response.json().await?;
        Ok(body.meals.unwrap_or_default())
    }
}

#[async_trait]
impl ExternalRecipeSource for MealDbSource {
    async fn search(&self, query: &str) -> Vec<ExternalRecipe> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.fetch("search.php", ("s", query)).await {
            Ok(meals) => meals
                .iter()
                .filter_map(Value::as_object)
                .map(transform_meal)
                .collect(),
            Err(e) => {
                tracing::warn!(query = %query, "external search failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn lookup(&self, id: &str) -> Option<ExternalRecipe> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }

        match self.fetch("lookup.php", ("i", id)).await {
            Ok(meals) => meals.first().and_then(Value::as_object).map(transform_meal),
            Err(e) => {
                tracing::warn!(id = %id, "external lookup failed: {}", e);
                None
            }
        }
    }
}
