//! Offline schema check for recipe JSON files
//!
//! Runs the same checks as the import endpoint, so a file that passes
//! here will be accepted by `POST /api/recipes/import`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use recipectl_core::{
    read_recipe_array, validate_recipes_for_import, ImportError, RecipeError, RecipeLimits,
    RecipectlConfig,
};

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// JSON files, each holding an array of recipes
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Outcome for one file
#[derive(Debug, Default)]
pub struct FileReport {
    pub failed: bool,
    pub messages: Vec<String>,
}

impl FileReport {
    fn failure(message: String) -> Self {
        Self {
            failed: true,
            messages: vec![message],
        }
    }
}

/// Check one file and describe every problem found
pub fn validate_file(path: &Path, limits: &RecipeLimits) -> FileReport {
    let items = match read_recipe_array(path) {
        Ok(items) => items,
        Err(e) => return FileReport::failure(describe_read_error(path, e)),
    };

    let (_, errors) = validate_recipes_for_import(&items, limits);
    FileReport {
        failed: !errors.is_empty(),
        messages: describe_errors(&errors),
    }
}

fn describe_read_error(path: &Path, error: RecipeError) -> String {
    match error {
        RecipeError::PathNotFound { .. } => format!("Error: File not found: {}", path.display()),
        RecipeError::Io { source } => format!("Error: Cannot read file: {}", source),
        RecipeError::Json { source, .. } => {
            format!("Error: Invalid JSON at line {}: {}", source.line(), source)
        }
        RecipeError::InvalidFormat { .. } => {
            "Error: Root must be a JSON array of recipes".to_string()
        }
        other => format!("Error: {}", other),
    }
}

/// One message per failing recipe, listing each field error under it
fn describe_errors(errors: &[ImportError]) -> Vec<String> {
    let mut messages = Vec::new();
    let mut start = 0;

    while start < errors.len() {
        let first = &errors[start];
        let end = errors[start..]
            .iter()
            .position(|e| e.index != first.index)
            .map_or(errors.len(), |offset| start + offset);

        let mut message = format!(
            "Recipe at index {} (id={}, title={:?}):",
            first.index, first.recipe_id, first.recipe_title
        );
        for e in &errors[start..end] {
            message.push_str(&format!("\n  - {}: {}", e.loc.join("."), e.msg));
        }
        messages.push(message);
        start = end;
    }

    messages
}

/// Validate every file; returns whether all of them passed.
pub fn run_validate(args: ValidateArgs) -> Result<bool> {
    let config = RecipectlConfig::load().context("Failed to load config")?;
    let limits = config.limits();

    let mut failed = false;
    for path in &args.files {
        tracing::debug!(path = %path.display(), "validating");
        let report = validate_file(path, &limits);
        for message in &report.messages {
            println!("{}", message);
        }
        failed |= report.failed;
    }

    if failed {
        eprintln!("\nValidation failed.");
        return Ok(false);
    }

    println!("All recipes passed schema validation.");
    Ok(true)
}
