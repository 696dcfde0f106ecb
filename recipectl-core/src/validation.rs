//! Server-side recipe validation
//!
//! The editor's ingredient cap is advisory. The limits here are the ones
//! the API actually enforces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::MAX_TITLE_LENGTH;

/// Default server-side cap on ingredients per recipe
pub const MAX_INGREDIENTS: usize = 50;

/// Validation error for recipe input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// List has more entries than allowed
    TooMany { field: &'static str, max: usize },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::TooLong { field, .. } | Self::TooMany { field, .. } => {
                field
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::TooMany { field, max } => {
                write!(f, "{} exceeds maximum of {} entries", field, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Limits enforced on every create, update and import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeLimits {
    pub max_ingredients: usize,
    pub max_title_length: usize,
}

impl Default for RecipeLimits {
    fn default() -> Self {
        Self {
            max_ingredients: MAX_INGREDIENTS,
            max_title_length: MAX_TITLE_LENGTH,
        }
    }
}

/// Check the fields shared by create and update bodies.
///
/// # Rules
/// - Title non-empty after trimming, at most `max_title_length` characters
/// - At least one ingredient, at most `max_ingredients`
/// - At least one instruction step
pub fn validate_fields(
    title: &str,
    ingredients: &[String],
    instructions: &[String],
    limits: &RecipeLimits,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::Empty { field: "title" });
    }

    if title.chars().count() > limits.max_title_length {
        return Err(ValidationError::TooLong {
            field: "title",
            max: limits.max_title_length,
        });
    }

    if ingredients.is_empty() {
        return Err(ValidationError::Empty {
            field: "ingredients",
        });
    }

    if ingredients.len() > limits.max_ingredients {
        return Err(ValidationError::TooMany {
            field: "ingredients",
            max: limits.max_ingredients,
        });
    }

    if instructions.is_empty() {
        return Err(ValidationError::Empty {
            field: "instructions",
        });
    }

    Ok(())
}
