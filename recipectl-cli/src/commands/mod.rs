//! Command implementations for recipectl CLI

pub mod recipe;
pub mod serve;
pub mod validate;

// Re-export main dispatcher functions for flat access from main.rs
pub use recipe::{run_create, run_edit, run_list, run_new};
pub use serve::run_serve;
pub use validate::run_validate;
