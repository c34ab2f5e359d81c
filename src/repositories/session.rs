// src/repositories/session.rs
//
// Unit of work over the SQLite connection pool.
//
// PRINCIPLES:
// - Changes are staged in memory and committed together in one transaction
// - Validation runs before any SQL is sent; all failures are reported at once
// - An update/delete that matches no row is a concurrency conflict
// - Blocking SQLite work runs on tokio's blocking pool
// - Single attempt: no retries, no backoff

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::db::ConnectionPool;
use crate::domain::FieldError;
use crate::repositories::entity::{Entity, EntityId};
use crate::repositories::error::{RepoError, RepoResult, ValidationErrors};

/// What `save()` does when a staged update or delete hits a stale or
/// missing row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Roll back, log a warning and report zero affected rows.
    #[default]
    Ignore,
    /// Roll back and return `RepoError::Conflict`.
    Fail,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(ConflictPolicy::Ignore),
            "fail" => Ok(ConflictPolicy::Fail),
            other => Err(format!("unknown conflict policy `{other}` (expected `ignore` or `fail`)")),
        }
    }
}

// ============================================================================
// STAGED CHANGES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

/// Why applying a change inside the commit transaction failed.
pub(crate) enum ApplyError {
    Conflict(&'static str),
    Store(rusqlite::Error),
}

impl From<rusqlite::Error> for ApplyError {
    fn from(err: rusqlite::Error) -> Self {
        ApplyError::Store(err)
    }
}

/// Type-erased change so one session can carry several entity types.
pub(crate) trait StagedChange: Send {
    fn validate(&self) -> Vec<FieldError>;

    /// Execute inside the commit transaction. Returns affected rows and the
    /// key assigned by the store, if any.
    fn apply(&self, conn: &Connection) -> Result<(usize, Option<EntityId>), ApplyError>;

    /// Called once the transaction has committed.
    fn committed(&self, _assigned: EntityId) {}
}

pub(crate) struct Change<T: Entity> {
    kind: ChangeKind,
    entity: T,
    key_slot: Option<Arc<OnceLock<EntityId>>>,
}

impl<T: Entity> Change<T> {
    pub(crate) fn added(entity: T, key_slot: Option<Arc<OnceLock<EntityId>>>) -> Self {
        Self {
            kind: ChangeKind::Added,
            entity,
            key_slot,
        }
    }

    pub(crate) fn modified(entity: T) -> Self {
        Self {
            kind: ChangeKind::Modified,
            entity,
            key_slot: None,
        }
    }

    pub(crate) fn deleted(entity: T) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            entity,
            key_slot: None,
        }
    }

    fn insert(&self, conn: &Connection) -> Result<(usize, Option<EntityId>), ApplyError> {
        let mut columns: Vec<&str> = Vec::with_capacity(T::COLUMNS.len() + 1);
        let mut values: Vec<Value> = Vec::with_capacity(T::COLUMNS.len() + 1);

        if let Some(id) = self.entity.id() {
            columns.push(T::KEY);
            values.push(Value::Integer(id));
        }
        columns.extend(T::COLUMNS.iter().copied());
        values.extend(self.entity.values());

        let marks = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({marks})",
            T::TABLE,
            columns.join(", ")
        );

        let rows = conn.execute(&sql, params_from_iter(values))?;
        let assigned = match self.entity.id() {
            Some(_) => None,
            None => Some(conn.last_insert_rowid()),
        };
        Ok((rows, assigned))
    }

    fn update(&self, conn: &Connection) -> Result<(usize, Option<EntityId>), ApplyError> {
        let Some(id) = self.entity.id() else {
            return Err(ApplyError::Conflict(T::TABLE));
        };

        let mut assignments = Vec::with_capacity(T::COLUMNS.len());
        let mut values = Vec::with_capacity(T::COLUMNS.len() + 2);
        for (column, value) in T::COLUMNS.iter().zip(self.entity.values()) {
            if Some(*column) == T::VERSION {
                assignments.push(format!("{column} = {column} + 1"));
            } else {
                assignments.push(format!("{column} = ?"));
                values.push(value);
            }
        }

        let mut sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            T::TABLE,
            assignments.join(", "),
            T::KEY
        );
        values.push(Value::Integer(id));
        self.push_version_guard(&mut sql, &mut values);

        let rows = conn.execute(&sql, params_from_iter(values))?;
        if rows == 0 {
            return Err(ApplyError::Conflict(T::TABLE));
        }
        Ok((rows, None))
    }

    fn delete(&self, conn: &Connection) -> Result<(usize, Option<EntityId>), ApplyError> {
        let Some(id) = self.entity.id() else {
            return Err(ApplyError::Conflict(T::TABLE));
        };

        let mut sql = format!("DELETE FROM {} WHERE {} = ?", T::TABLE, T::KEY);
        let mut values = vec![Value::Integer(id)];
        self.push_version_guard(&mut sql, &mut values);

        let rows = conn.execute(&sql, params_from_iter(values))?;
        if rows == 0 {
            return Err(ApplyError::Conflict(T::TABLE));
        }
        Ok((rows, None))
    }

    fn push_version_guard(&self, sql: &mut String, values: &mut Vec<Value>) {
        if let (Some(column), Some(version)) = (T::VERSION, self.entity.version()) {
            sql.push_str(&format!(" AND {column} = ?"));
            values.push(Value::Integer(version));
        }
    }
}

impl<T: Entity> StagedChange for Change<T> {
    fn validate(&self) -> Vec<FieldError> {
        match self.kind {
            ChangeKind::Added | ChangeKind::Modified => self.entity.validate(),
            ChangeKind::Deleted => Vec::new(),
        }
    }

    fn apply(&self, conn: &Connection) -> Result<(usize, Option<EntityId>), ApplyError> {
        match self.kind {
            ChangeKind::Added => self.insert(conn),
            ChangeKind::Modified => self.update(conn),
            ChangeKind::Deleted => self.delete(conn),
        }
    }

    fn committed(&self, assigned: EntityId) {
        if let Some(slot) = &self.key_slot {
            let _ = slot.set(assigned);
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Tracks staged changes and commits them transactionally.
///
/// A session is meant for one logical operation at a time; the mutex only
/// makes it `Send + Sync`, it does not coordinate concurrent callers.
pub struct DbSession {
    pool: Arc<ConnectionPool>,
    staged: Mutex<Vec<Box<dyn StagedChange>>>,
    conflict_policy: ConflictPolicy,
}

impl DbSession {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            staged: Mutex::new(Vec::new()),
            conflict_policy: ConflictPolicy::default(),
        }
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Number of changes waiting for `save()`.
    pub fn pending(&self) -> usize {
        self.lock_staged().len()
    }

    /// Drop every staged change without touching the store.
    pub fn discard(&self) -> usize {
        let mut staged = self.lock_staged();
        let dropped = staged.len();
        staged.clear();
        dropped
    }

    pub(crate) fn stage(&self, change: Box<dyn StagedChange>) {
        self.lock_staged().push(change);
    }

    /// Commit every staged change. Returns the number of affected rows.
    ///
    /// The staged set is cleared whether or not the commit succeeds.
    pub async fn save(&self) -> RepoResult<usize> {
        let changes = std::mem::take(&mut *self.lock_staged());
        if changes.is_empty() {
            return Ok(0);
        }

        let failures: Vec<FieldError> = changes.iter().flat_map(|c| c.validate()).collect();
        if !failures.is_empty() {
            return Err(RepoError::Validation(ValidationErrors(failures)));
        }

        let count = changes.len();
        let result = self
            .run(move |conn| {
                let outcome = commit(conn, &changes);
                Ok(outcome)
            })
            .await?;

        match result {
            Ok(rows) => {
                debug!("Committed {count} staged change(s), {rows} row(s) affected");
                Ok(rows)
            }
            Err(ApplyError::Conflict(table)) => match self.conflict_policy {
                ConflictPolicy::Ignore => {
                    warn!("Concurrency conflict on `{table}` ignored; {count} staged change(s) rolled back");
                    Ok(0)
                }
                ConflictPolicy::Fail => Err(RepoError::Conflict { table }),
            },
            Err(ApplyError::Store(err)) => Err(translate_store_error(err)),
        }
    }

    /// Run blocking work against a pooled connection.
    pub(crate) async fn run<F, R>(&self, work: F) -> RepoResult<R>
    where
        F: FnOnce(&mut Connection) -> RepoResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            work(&mut conn)
        })
        .await
        .map_err(|e| RepoError::Task(e.to_string()))?
    }

    fn lock_staged(&self) -> MutexGuard<'_, Vec<Box<dyn StagedChange>>> {
        self.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Apply every change in one transaction. Keys are published to their
/// entities only after the commit succeeds.
fn commit(conn: &mut Connection, changes: &[Box<dyn StagedChange>]) -> Result<usize, ApplyError> {
    let tx = conn.transaction()?;
    let mut rows = 0;
    let mut assigned = Vec::new();

    for (index, change) in changes.iter().enumerate() {
        let (affected, key) = change.apply(&tx)?;
        rows += affected;
        if let Some(key) = key {
            assigned.push((index, key));
        }
    }

    tx.commit()?;

    for (index, key) in assigned {
        changes[index].committed(key);
    }
    Ok(rows)
}

/// NOT NULL and UNIQUE violations name the offending columns; surface them
/// as field errors. Everything else keeps the store's message.
fn translate_store_error(err: rusqlite::Error) -> RepoError {
    if let rusqlite::Error::SqliteFailure(code, Some(message)) = &err {
        let reason = match code.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL => Some("value is required"),
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => Some("value is already taken"),
            _ => None,
        };
        if let Some(reason) = reason {
            return RepoError::Validation(ValidationErrors(constraint_fields(message, reason)));
        }
    }
    RepoError::Store(err.to_string())
}

/// `"UNIQUE constraint failed: t.a, t.b"` → one error per column.
fn constraint_fields(message: &str, reason: &str) -> Vec<FieldError> {
    let columns = message.rsplit(':').next().unwrap_or(message);
    columns
        .split(',')
        .map(|qualified| qualified.rsplit('.').next().unwrap_or(qualified).trim())
        .filter(|column| !column.is_empty())
        .map(|column| FieldError::new(column, reason))
        .collect()
}
