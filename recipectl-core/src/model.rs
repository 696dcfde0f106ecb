//! Recipe domain types shared by the server and the CLI

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::validation::{validate_fields, RecipeLimits, ValidationError};

/// Maximum title length in characters
pub const MAX_TITLE_LENGTH: usize = 200;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Naive layouts accepted for timestamps, tried in order
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO 8601 timestamp.
///
/// Accepts a `T` or space separator, optional seconds and fraction, a
/// trailing `Z` or `+HH:MM` offset (the wall-clock time is kept) and a
/// bare date (midnight).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Some(ts) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
    {
        return Some(ts);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_local());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime: {}", raw)))
}

/// A stored recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default = "new_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    /// Steps in order; position is the step number
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default = "now", deserialize_with = "deserialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(default = "now", deserialize_with = "deserialize_timestamp")]
    pub updated_at: NaiveDateTime,
}

impl Recipe {
    /// Build a new recipe with a fresh id and timestamps.
    pub fn create(input: RecipeCreate) -> Self {
        let created = now();
        Self {
            id: new_id(),
            title: input.title,
            description: input.description,
            ingredients: input.ingredients,
            instructions: input.instructions,
            tags: input.tags,
            cuisine: input.cuisine,
            created_at: created,
            updated_at: created,
        }
    }

    /// Replace the editable fields and bump `updated_at`.
    pub fn apply_update(&mut self, update: RecipeUpdate) {
        self.title = update.title;
        self.description = update.description;
        self.ingredients = update.ingredients;
        self.instructions = update.instructions;
        self.tags = update.tags;
        self.cuisine = update.cuisine;
        self.updated_at = now();
    }

    /// Case-insensitive title match. An empty query matches everything.
    pub fn title_matches(&self, query: &str) -> bool {
        query.is_empty() || self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
}

impl RecipeCreate {
    pub fn validate(&self, limits: &RecipeLimits) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.ingredients, &self.instructions, limits)
    }
}

/// Body of an update request (every field is replaced)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
}

impl RecipeUpdate {
    pub fn validate(&self, limits: &RecipeLimits) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.ingredients, &self.instructions, limits)
    }
}

impl From<RecipeCreate> for RecipeUpdate {
    fn from(c: RecipeCreate) -> Self {
        Self {
            title: c.title,
            description: c.description,
            ingredients: c.ingredients,
            instructions: c.instructions,
            tags: c.tags,
            cuisine: c.cuisine,
        }
    }
}
