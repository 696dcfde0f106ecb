//! recipectl-server: JSON API for recipes
//!
//! The backend that recipe forms submit to. Validates every body against
//! the configured limits (including the ingredient cap) and keeps recipes
//! in memory for the lifetime of the process. Searches and id lookups can
//! also reach an external recipe source.

pub mod error;
pub mod external;
pub mod extractors;
pub mod routes;
pub mod server;
pub mod store;

pub use error::ApiError;
pub use external::{ExternalRecipe, ExternalRecipeSource, MealDbSource};
pub use server::{build_router, run_server, seed_from_file, AppState, ServerConfig, ServerError};
pub use store::RecipeStore;
