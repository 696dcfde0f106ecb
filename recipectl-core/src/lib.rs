//! recipectl-core: recipe form editing and validation
//!
//! - [`editor`]: add/remove/renumber behavior for the repeated form rows
//! - [`model`], [`validation`]: recipe types and the limits the API enforces
//! - [`import`]: legacy-format migration and bulk schema checks
//! - [`form`]: raw form input to request bodies
//! - [`config`]: `~/.recipectl/config.toml`

pub mod config;
pub mod editor;
pub mod error;
pub mod form;
pub mod import;
pub mod model;
pub mod validation;

pub use config::RecipectlConfig;
pub use editor::{
    AddOutcome, EditorConfig, EditorEvent, EditorGroups, EditorSubmission, FieldGroup,
    GroupEvent, GroupKind, ListEditor, Notice, NoticeLog, Notifier, RemoveOutcome, Row, RowId,
};
pub use error::{RecipeError, Result};
pub use form::RecipeForm;
pub use import::{
    migrate_legacy_recipe, read_recipe_array, validate_recipes_for_import, FieldError, ImportError,
};
pub use model::{parse_timestamp, Recipe, RecipeCreate, RecipeUpdate};
pub use validation::{RecipeLimits, ValidationError};
