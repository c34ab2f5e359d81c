// src/repositories/repository.rs
//
// Generic repository
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers over a DbSession
// - NO business logic beyond Entity::validate
// - Writes stage into the session; `auto_save` commits immediately
// - Reads go straight to the store and never see staged changes

use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::repositories::entity::{select_columns, Entity, EntityId};
use crate::repositories::error::{RepoError, RepoResult};
use crate::repositories::query::{Filter, Page, PageRequest, Query};
use crate::repositories::session::{Change, DbSession};

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert one record. With `auto_save` the returned entity carries its
    /// store-assigned key; a staged insert is returned unchanged.
    async fn add(&self, entity: T, auto_save: bool) -> RepoResult<T>;

    /// Insert a batch. Returns committed rows, 0 when only staged.
    async fn add_many(&self, entities: Vec<T>, auto_save: bool) -> RepoResult<usize>;

    /// Overwrite every column of an existing record.
    async fn update(&self, entity: T, auto_save: bool) -> RepoResult<bool>;

    async fn update_many(&self, entities: Vec<T>, auto_save: bool) -> RepoResult<usize>;

    async fn delete(&self, entity: T, auto_save: bool) -> RepoResult<bool>;

    async fn delete_many(&self, entities: Vec<T>, auto_save: bool) -> RepoResult<usize>;

    /// Commit everything staged on the underlying session.
    async fn save(&self) -> RepoResult<usize>;

    /// Matching rows, or all rows without a filter.
    async fn count(&self, filter: Option<Filter>) -> RepoResult<u64>;

    async fn exists(&self, filter: Filter) -> RepoResult<bool>;

    async fn find_by_id(&self, id: EntityId) -> RepoResult<Option<T>>;

    /// `Ok(None)` when nothing matches, `AmbiguousMatch` when several rows do.
    async fn find_one(&self, filter: Filter) -> RepoResult<Option<T>>;

    async fn find_list(&self, query: Query) -> RepoResult<Vec<T>>;

    async fn find_page(&self, request: PageRequest) -> RepoResult<Page<T>>;

    async fn find_all(&self) -> RepoResult<Vec<T>> {
        self.find_list(Query::default()).await
    }
}

/// SQLite-backed repository for any `Entity`.
pub struct SqlRepository<T> {
    session: Arc<DbSession>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for SqlRepository<T> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> SqlRepository<T> {
    pub fn new(session: Arc<DbSession>) -> Self {
        Self {
            session,
            _entity: PhantomData,
        }
    }

    pub fn session(&self) -> &Arc<DbSession> {
        &self.session
    }

    fn require_key(entity: &T) -> RepoResult<()> {
        match entity.id() {
            Some(_) => Ok(()),
            None => Err(RepoError::MissingKey { table: T::TABLE }),
        }
    }

    async fn save_if(&self, auto_save: bool) -> RepoResult<usize> {
        if auto_save {
            self.session.save().await
        } else {
            Ok(0)
        }
    }

    async fn select(&self, sql: String, params: Vec<Value>) -> RepoResult<Vec<T>> {
        self.session
            .run(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows: Vec<T> = stmt
                    .query_map(params_from_iter(params), |row| T::from_row(row))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for SqlRepository<T> {
    async fn add(&self, mut entity: T, auto_save: bool) -> RepoResult<T> {
        let slot = Arc::new(OnceLock::new());
        self.session
            .stage(Box::new(Change::added(entity.clone(), Some(Arc::clone(&slot)))));

        if auto_save {
            // Zero rows means another staged change conflicted and the
            // whole commit, this insert included, was rolled back.
            if self.session.save().await? == 0 {
                return Err(RepoError::Conflict { table: T::TABLE });
            }
            if let Some(id) = slot.get() {
                entity.set_id(*id);
            }
        }
        Ok(entity)
    }

    async fn add_many(&self, entities: Vec<T>, auto_save: bool) -> RepoResult<usize> {
        for entity in entities {
            self.session.stage(Box::new(Change::added(entity, None)));
        }
        self.save_if(auto_save).await
    }

    async fn update(&self, entity: T, auto_save: bool) -> RepoResult<bool> {
        Self::require_key(&entity)?;
        self.session.stage(Box::new(Change::modified(entity)));
        if auto_save {
            return Ok(self.session.save().await? > 0);
        }
        Ok(true)
    }

    async fn update_many(&self, entities: Vec<T>, auto_save: bool) -> RepoResult<usize> {
        entities.iter().try_for_each(Self::require_key)?;
        for entity in entities {
            self.session.stage(Box::new(Change::modified(entity)));
        }
        self.save_if(auto_save).await
    }

    async fn delete(&self, entity: T, auto_save: bool) -> RepoResult<bool> {
        // A never-persisted entity still goes through the store so it is
        // handled exactly like a row deleted by someone else.
        self.session.stage(Box::new(Change::deleted(entity)));
        if auto_save {
            return Ok(self.session.save().await? > 0);
        }
        Ok(true)
    }

    async fn delete_many(&self, entities: Vec<T>, auto_save: bool) -> RepoResult<usize> {
        for entity in entities {
            self.session.stage(Box::new(Change::deleted(entity)));
        }
        self.save_if(auto_save).await
    }

    async fn save(&self) -> RepoResult<usize> {
        self.session.save().await
    }

    async fn count(&self, filter: Option<Filter>) -> RepoResult<u64> {
        let (clause, params) = Query {
            filter,
            ..Query::default()
        }
        .where_clause::<T>()?;
        let sql = format!("SELECT COUNT(*) FROM {}{clause}", T::TABLE);

        self.session
            .run(move |conn| {
                let count: i64 =
                    conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
    }

    async fn exists(&self, filter: Filter) -> RepoResult<bool> {
        let (clause, params) = Query::filtered(filter).where_clause::<T>()?;
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {}{clause})", T::TABLE);

        self.session
            .run(move |conn| {
                let found: bool =
                    conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?;
                Ok(found)
            })
            .await
    }

    async fn find_by_id(&self, id: EntityId) -> RepoResult<Option<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            select_columns::<T>(),
            T::TABLE,
            T::KEY
        );
        let mut rows = self.select(sql, vec![Value::Integer(id)]).await?;
        Ok(rows.pop())
    }

    async fn find_one(&self, filter: Filter) -> RepoResult<Option<T>> {
        let (clause, params) = Query::filtered(filter).where_clause::<T>()?;
        let sql = format!(
            "SELECT {} FROM {}{clause} LIMIT 2",
            select_columns::<T>(),
            T::TABLE
        );

        let mut rows = self.select(sql, params).await?;
        if rows.len() > 1 {
            return Err(RepoError::AmbiguousMatch { table: T::TABLE });
        }
        Ok(rows.pop())
    }

    async fn find_list(&self, query: Query) -> RepoResult<Vec<T>> {
        let (clause, mut params) = query.where_clause::<T>()?;
        let order = query.order_clause::<T>(false)?;
        let mut sql = format!(
            "SELECT {} FROM {}{clause}{order}",
            select_columns::<T>(),
            T::TABLE
        );
        if query.limit > 0 {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(i64::from(query.limit)));
        }

        self.select(sql, params).await
    }

    async fn find_page(&self, request: PageRequest) -> RepoResult<Page<T>> {
        let offset = request.offset()?;

        let (clause, params) = request.query.where_clause::<T>()?;
        let order = request.query.order_clause::<T>(true)?;
        let count_sql = format!("SELECT COUNT(*) FROM {}{clause}", T::TABLE);
        let page_sql = format!(
            "SELECT {} FROM {}{clause}{order} LIMIT ? OFFSET ?",
            select_columns::<T>(),
            T::TABLE
        );
        let mut page_params = params.clone();
        page_params.push(Value::Integer(i64::from(request.size)));
        page_params.push(Value::Integer(offset));

        let (items, total) = self
            .session
            .run(move |conn| {
                // Count and slice read the same snapshot.
                let tx = conn.transaction()?;
                let total: i64 =
                    tx.query_row(&count_sql, params_from_iter(params), |row| row.get(0))?;
                let items = {
                    let mut stmt = tx.prepare(&page_sql)?;
                    let rows = stmt
                        .query_map(params_from_iter(page_params), |row| T::from_row(row))?
                        .collect::<Result<Vec<_>, _>>()?;
                    rows
                };
                tx.commit()?;
                Ok((items, total as u64))
            })
            .await?;

        Ok(Page {
            items,
            total,
            index: request.index,
            size: request.size,
        })
    }
}
