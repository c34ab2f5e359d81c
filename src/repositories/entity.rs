// src/repositories/entity.rs
//
// The contract a record type fulfils to be stored through `SqlRepository`.
// Mapping is explicit: each entity names its table and columns and converts
// itself to and from rows. No reflection, no derived SQL.

use rusqlite::types::Value;
use rusqlite::Row;

use crate::domain::FieldError;
use crate::repositories::error::{RepoError, RepoResult};

/// Integer primary key (SQLite rowid).
pub type EntityId = i64;

pub trait Entity: Clone + Send + Sync + 'static {
    /// Table the entity lives in.
    const TABLE: &'static str;

    /// Primary key column.
    const KEY: &'static str = "id";

    /// Non-key columns, in the same order as `values()`.
    const COLUMNS: &'static [&'static str];

    /// Column holding the optimistic-concurrency token, if any.
    /// Must also be listed in `COLUMNS`.
    const VERSION: Option<&'static str> = None;

    fn id(&self) -> Option<EntityId>;

    fn set_id(&mut self, id: EntityId);

    /// Column values matching `COLUMNS`.
    fn values(&self) -> Vec<Value>;

    /// Build an entity from a row selected with `select_columns()`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Field-level checks run before every insert or update is committed.
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }

    /// Current value of the `VERSION` column.
    fn version(&self) -> Option<i64> {
        None
    }
}

/// `key, col1, col2, ...` for SELECT statements.
pub(crate) fn select_columns<T: Entity>() -> String {
    std::iter::once(T::KEY)
        .chain(T::COLUMNS.iter().copied())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rejects any column name the entity does not declare.
pub(crate) fn ensure_column<T: Entity>(column: &str) -> RepoResult<&'static str> {
    std::iter::once(T::KEY)
        .chain(T::COLUMNS.iter().copied())
        .find(|known| *known == column)
        .ok_or_else(|| RepoError::UnknownColumn {
            table: T::TABLE,
            column: column.to_string(),
        })
}
