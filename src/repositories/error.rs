// src/repositories/error.rs
//
// Repository error taxonomy:
// - field validation failures, aggregated into one value
// - optimistic-concurrency conflicts (only surfaced under ConflictPolicy::Fail)
// - everything else wrapped with the original store message

use std::fmt;
use thiserror::Error;

use crate::domain::FieldError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Validation failed:\n{0}")]
    Validation(ValidationErrors),

    #[error("Concurrency conflict on `{table}`: the record was changed or removed by another writer")]
    Conflict { table: &'static str },

    #[error("More than one `{table}` row matched a single-row lookup")]
    AmbiguousMatch { table: &'static str },

    #[error("Invalid page request: index {index}, size {size} (both must be >= 1)")]
    InvalidPage { index: u32, size: u32 },

    #[error("Unknown column `{column}` for `{table}`")]
    UnknownColumn { table: &'static str, column: String },

    #[error("`{table}` entity has no key; it was never persisted")]
    MissingKey { table: &'static str },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Task error: {0}")]
    Task(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(err: rusqlite::Error) -> Self {
        RepoError::Store(err.to_string())
    }
}

impl From<r2d2::Error> for RepoError {
    fn from(err: r2d2::Error) -> Self {
        RepoError::Pool(err.to_string())
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Every field failure of one commit attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.0 {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = RepoError::Validation(ValidationErrors(vec![
            FieldError::new("title", "title cannot be empty"),
            FieldError::new("author", "author cannot be empty"),
        ]));

        let message = err.to_string();
        assert!(message.contains("field: title, error: title cannot be empty"));
        assert!(message.contains("field: author, error: author cannot be empty"));
    }

    #[test]
    fn test_store_error_keeps_original_message() {
        let err = RepoError::from(rusqlite::Error::InvalidQuery);
        assert!(err.to_string().contains(&rusqlite::Error::InvalidQuery.to_string()));
    }
}
