//! Turning raw form input into a recipe request body

use crate::editor::EditorSubmission;
use crate::model::RecipeCreate;

/// One entry per line, trimmed, blank lines dropped
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Comma-separated tags, trimmed, blanks dropped
pub fn parse_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Scalar fields of the recipe form, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeForm {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub cuisine: String,
}

impl RecipeForm {
    /// Combine the scalar fields with the editor's rows.
    ///
    /// Blank rows are dropped; row order is the step order.
    pub fn into_request(self, rows: EditorSubmission) -> RecipeCreate {
        let cuisine = self.cuisine.trim();
        RecipeCreate {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            ingredients: rows
                .ingredients
                .into_iter()
                .filter(|v| !v.is_empty())
                .collect(),
            instructions: rows
                .instructions
                .into_iter()
                .filter(|v| !v.is_empty())
                .collect(),
            tags: parse_tags(&self.tags),
            cuisine: (!cuisine.is_empty()).then(|| cuisine.to_string()),
        }
    }

    /// Build from free-text fields: ingredients and steps one per line.
    pub fn with_text_rows(self, ingredients: &str, instructions: &str) -> RecipeCreate {
        self.into_request(EditorSubmission {
            ingredients: parse_lines(ingredients),
            instructions: parse_lines(instructions),
        })
    }
}
