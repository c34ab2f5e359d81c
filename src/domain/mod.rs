// src/domain/mod.rs
//
// Domain Root
//
// Declares the domain modules and re-exports their public API.
// Other modules import from `crate::domain::*`.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod article;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use article::{validate_article, Article};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use serde::Serialize;
use std::fmt;

/// A single field-level validation failure.
///
/// Entities report these from `Entity::validate`; the session aggregates
/// every failure of a commit into one `ValidationErrors` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field: {}, error: {}", self.field, self.message)
    }
}
