//! Bulk import: legacy-format migration and schema checks
//!
//! Used by `POST /api/recipes/import`, server seeding and `recipectl validate`.
//! Every item is checked; errors are collected rather than stopping at the
//! first bad recipe.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{self, RecipeError};
use crate::model::{parse_timestamp, Recipe};
use crate::validation::RecipeLimits;

/// Validation problem with one field of one imported item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path to the field, starting with `"body"`
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    fn new(path: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        let mut loc = vec!["body".to_string()];
        loc.extend(path.iter().map(|p| p.to_string()));
        Self {
            loc,
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }
}

/// A field error tagged with the item it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportError {
    pub index: usize,
    pub recipe_id: String,
    pub recipe_title: String,
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Normalize legacy recipe layouts before validation.
///
/// - string `instructions` are split on blank lines into trimmed steps
/// - obsolete `difficulty` is dropped
/// - `cuisine` and `tags` get their defaults when absent
///
/// Non-object values are returned unchanged.
pub fn migrate_legacy_recipe(value: &Value) -> Value {
    let Value::Object(source) = value else {
        return value.clone();
    };
    let mut data: Map<String, Value> = source.clone();

    if let Some(Value::String(text)) = data.get("instructions") {
        let steps: Vec<Value> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_string()))
            .collect();
        let steps = if steps.is_empty() {
            vec![Value::String(text.clone())]
        } else {
            steps
        };
        data.insert("instructions".into(), Value::Array(steps));
    }

    data.remove("difficulty");
    data.entry("cuisine").or_insert(Value::Null);
    data.entry("tags").or_insert_with(|| Value::Array(Vec::new()));

    Value::Object(data)
}

fn check_string(data: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) {
    match data.get(field) {
        None => errors.push(FieldError::new(&[field], "Field required", "missing")),
        Some(Value::String(_)) => {}
        Some(_) => errors.push(FieldError::new(
            &[field],
            "Input should be a valid string",
            "string_type",
        )),
    }
}

fn check_string_list(
    data: &Map<String, Value>,
    field: &str,
    required: bool,
    errors: &mut Vec<FieldError>,
) {
    match data.get(field) {
        None if required => errors.push(FieldError::new(&[field], "Field required", "missing")),
        None => {}
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    let index = i.to_string();
                    errors.push(FieldError::new(
                        &[field, index.as_str()],
                        "Input should be a valid string",
                        "string_type",
                    ));
                }
            }
        }
        Some(_) => errors.push(FieldError::new(
            &[field],
            "Input should be a valid list",
            "list_type",
        )),
    }
}

fn check_timestamp(data: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) {
    match data.get(field) {
        None => {}
        Some(Value::String(s)) if parse_timestamp(s).is_some() => {}
        Some(_) => errors.push(FieldError::new(
            &[field],
            "Input should be a valid datetime",
            "datetime_parsing",
        )),
    }
}

/// Migrate and validate a single import item.
pub fn validate_recipe_for_import(
    value: &Value,
    limits: &RecipeLimits,
) -> Result<Recipe, Vec<FieldError>> {
    let migrated = migrate_legacy_recipe(value);
    let Value::Object(data) = &migrated else {
        return Err(vec![FieldError::new(
            &[],
            format!("Each item must be an object, got {}", json_type_name(value)),
            "type_error",
        )]);
    };

    let mut errors = Vec::new();
    if let Some(id) = data.get("id") {
        if !id.is_string() {
            errors.push(FieldError::new(
                &["id"],
                "Input should be a valid string",
                "string_type",
            ));
        }
    }
    check_string(data, "title", &mut errors);
    check_string(data, "description", &mut errors);
    check_string_list(data, "ingredients", true, &mut errors);
    check_string_list(data, "instructions", true, &mut errors);
    check_string_list(data, "tags", false, &mut errors);
    match data.get("cuisine") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => errors.push(FieldError::new(
            &["cuisine"],
            "Input should be a valid string",
            "string_type",
        )),
    }
    check_timestamp(data, "created_at", &mut errors);
    check_timestamp(data, "updated_at", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    let recipe: Recipe = serde_json::from_value(migrated.clone()).map_err(|e| {
        vec![FieldError::new(&[], e.to_string(), "value_error")]
    })?;

    if recipe.ingredients.len() > limits.max_ingredients {
        return Err(vec![FieldError::new(
            &["ingredients"],
            format!(
                "List should have at most {} items after validation, not {}",
                limits.max_ingredients,
                recipe.ingredients.len()
            ),
            "too_long",
        )]);
    }

    Ok(recipe)
}

/// Validate every item; returns the valid recipes and all errors found.
///
/// Callers normally reject the whole import when any error is present.
pub fn validate_recipes_for_import(
    items: &[Value],
    limits: &RecipeLimits,
) -> (Vec<Recipe>, Vec<ImportError>) {
    let mut valid = Vec::new();
    let mut all_errors = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match validate_recipe_for_import(item, limits) {
            Ok(recipe) => valid.push(recipe),
            Err(errors) => {
                let recipe_id = item
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or("?")
                    .to_string();
                let recipe_title = item
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("<no title>")
                    .to_string();
                all_errors.extend(errors.into_iter().map(|e| ImportError {
                    index,
                    recipe_id: recipe_id.clone(),
                    recipe_title: recipe_title.clone(),
                    loc: e.loc,
                    msg: e.msg,
                    kind: e.kind,
                }));
            }
        }
    }

    (valid, all_errors)
}

/// Read a file holding a JSON array of recipe items (not yet validated).
pub fn read_recipe_array(path: &Path) -> error::Result<Vec<Value>> {
    if !path.exists() {
        return Err(RecipeError::path_not_found(path));
    }

    let content = fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(&content)
        .map_err(|e| RecipeError::json(path.display().to_string(), e))?;

    match data {
        Value::Array(items) => Ok(items),
        other => Err(RecipeError::invalid_format(
            path.display().to_string(),
            format!("root must be a JSON array of recipes, got {}", json_type_name(&other)),
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
