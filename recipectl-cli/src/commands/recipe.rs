//! Recipe commands that talk to a running server
//!
//! `new` and `edit` open the terminal form; `create` and `list` are
//! plain one-shot commands for scripts.

use std::future::Future;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use reqwest::StatusCode;

use recipectl_core::{Recipe, RecipeCreate, RecipeForm, RecipeUpdate, RecipectlConfig};

use crate::client::{ApiFailure, RecipeClient};
use crate::tui::{self, App};

/// Server selection shared by every recipe command
#[derive(Parser, Debug)]
pub struct ServerArgs {
    /// Base URL of the recipe API (default from config)
    #[arg(long, env = "RECIPECTL_SERVER_URL")]
    pub server: Option<String>,
}

impl ServerArgs {
    fn client(&self, config: &RecipectlConfig) -> Result<RecipeClient> {
        let url = self.server.as_deref().unwrap_or(&config.client.server_url);
        RecipeClient::new(url)
    }
}

#[derive(Parser, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub server: ServerArgs,
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Recipe ID
    pub id: String,

    #[command(flatten)]
    pub server: ServerArgs,
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// File with one ingredient per line
    #[arg(long, value_name = "PATH")]
    pub ingredients: PathBuf,

    /// File with one step per line, in order
    #[arg(long, value_name = "PATH")]
    pub instructions: PathBuf,

    /// Comma-separated tags
    #[arg(long, default_value = "")]
    pub tags: String,

    #[arg(long, default_value = "")]
    pub cuisine: String,

    #[command(flatten)]
    pub server: ServerArgs,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only recipes whose title contains this text
    #[arg(long, short)]
    pub search: Option<String>,

    /// Print the recipes as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub server: ServerArgs,
}

/// Run the form on a blocking thread; the terminal loop does not yield.
async fn run_form(mut app: App) -> Result<(App, Option<RecipeCreate>)> {
    tokio::task::spawn_blocking(move || {
        let outcome = tui::run(&mut app);
        outcome.map(|request| (app, request))
    })
    .await
    .context("Editor thread panicked")?
}

/// Status-bar text for a rejection the user can fix in the form.
///
/// Other failures (connection errors, missing recipe) end the command.
fn rejection_message(error: &anyhow::Error) -> Option<String> {
    let failure = error.downcast_ref::<ApiFailure>()?;
    matches!(
        failure.status,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
    )
    .then(|| format!("Server rejected the recipe: {}", failure.message))
}

/// Show the form until the server accepts it; `None` when cancelled.
async fn save_from_form<F, Fut>(mut app: App, mut save: F) -> Result<Option<Recipe>>
where
    F: FnMut(RecipeCreate) -> Fut,
    Fut: Future<Output = Result<Recipe>>,
{
    loop {
        let (returned, outcome) = run_form(app).await?;
        app = returned;

        let Some(request) = outcome else {
            return Ok(None);
        };

        match save(request).await {
            Ok(recipe) => return Ok(Some(recipe)),
            Err(e) => match rejection_message(&e) {
                Some(message) => {
                    tracing::debug!("save rejected, reopening form: {}", message);
                    app.status_message = Some(message);
                }
                None => return Err(e),
            },
        }
    }
}

/// Open a blank form and create the recipe on save
pub async fn run_new(args: NewArgs) -> Result<()> {
    let config = RecipectlConfig::load().context("Failed to load config")?;
    let client = args.server.client(&config)?;

    let saved = save_from_form(App::new(config.editor), |request| {
        let client = &client;
        async move { client.create(&request).await }
    })
    .await?;

    match saved {
        Some(recipe) => println!("✓ Created recipe '{}' (id: {})", recipe.title, recipe.id),
        None => println!("Cancelled"),
    }
    Ok(())
}

/// Load a recipe into the form and replace it on save
pub async fn run_edit(args: EditArgs) -> Result<()> {
    let config = RecipectlConfig::load().context("Failed to load config")?;
    let client = args.server.client(&config)?;

    let recipe = client
        .get(&args.id)
        .await
        .with_context(|| format!("Failed to load recipe {}", args.id))?;

    let id = args.id.as_str();
    let saved = save_from_form(App::for_recipe(config.editor, &recipe), |request| {
        let client = &client;
        async move { client.update(id, &RecipeUpdate::from(request)).await }
    })
    .await?;

    match saved {
        Some(updated) => println!("✓ Updated recipe '{}' (id: {})", updated.title, updated.id),
        None => println!("Cancelled"),
    }
    Ok(())
}

/// Create a recipe from flags and line-per-entry files
pub async fn run_create(args: CreateArgs) -> Result<()> {
    let config = RecipectlConfig::load().context("Failed to load config")?;
    let client = args.server.client(&config)?;

    let ingredients = std::fs::read_to_string(&args.ingredients)
        .with_context(|| format!("Failed to read file: {}", args.ingredients.display()))?;
    let instructions = std::fs::read_to_string(&args.instructions)
        .with_context(|| format!("Failed to read file: {}", args.instructions.display()))?;

    let request = RecipeForm {
        title: args.title,
        description: args.description,
        tags: args.tags,
        cuisine: args.cuisine,
    }
    .with_text_rows(&ingredients, &instructions);

    request
        .validate(&config.limits())
        .map_err(|e| anyhow!("Invalid recipe: {}", e))?;

    let recipe = client.create(&request).await?;
    println!("✓ Created recipe '{}' (id: {})", recipe.title, recipe.id);
    Ok(())
}

/// List recipes, optionally filtered by title
pub async fn run_list(args: ListArgs) -> Result<()> {
    let config = RecipectlConfig::load().context("Failed to load config")?;
    let client = args.server.client(&config)?;

    let recipes = client.list(args.search.as_deref()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    if recipes.is_empty() {
        println!("No recipes found");
        return Ok(());
    }

    for listed in &recipes {
        let recipe = &listed.recipe;
        let cuisine = recipe.cuisine.as_deref().unwrap_or("-");
        let marker = if listed.source == "external" { " (external)" } else { "" };
        println!(
            "{}  {}{}  [{}] {} ingredients, {} steps",
            recipe.id,
            recipe.title,
            marker,
            cuisine,
            recipe.ingredients.len(),
            recipe.instructions.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(status: StatusCode) -> anyhow::Error {
        ApiFailure {
            status,
            message: "ingredients cannot be empty".into(),
        }
        .into()
    }

    #[test]
    fn validation_rejections_return_to_the_form() {
        for status in [StatusCode::UNPROCESSABLE_ENTITY, StatusCode::BAD_REQUEST] {
            assert_eq!(
                rejection_message(&failure(status)).as_deref(),
                Some("Server rejected the recipe: ingredients cannot be empty")
            );
        }
    }

    #[test]
    fn other_failures_end_the_command() {
        assert!(rejection_message(&failure(StatusCode::NOT_FOUND)).is_none());
        assert!(rejection_message(&anyhow!("Failed to connect to recipe server")).is_none());
    }

    #[test]
    fn context_does_not_hide_the_rejection() {
        let error = failure(StatusCode::UNPROCESSABLE_ENTITY).context("Saving recipe");
        assert!(rejection_message(&error).is_some());
    }
}
