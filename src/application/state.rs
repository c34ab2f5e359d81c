// src/application/state.rs

use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::repositories::{ArticleRepository, ConflictPolicy, DbSession, SqlRepository};
use crate::theme::ViewResolver;

/// Shared state handed to every request handler.
/// All fields are Arc-wrapped so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<ConnectionPool>,
    pub conflict_policy: ConflictPolicy,
    pub views: Arc<dyn ViewResolver>,
}

impl AppState {
    pub fn new(
        pool: Arc<ConnectionPool>,
        conflict_policy: ConflictPolicy,
        views: Arc<dyn ViewResolver>,
    ) -> Self {
        Self {
            pool,
            conflict_policy,
            views,
        }
    }

    /// A fresh session per request, so staged changes never cross requests.
    pub fn session(&self) -> Arc<DbSession> {
        Arc::new(DbSession::new(Arc::clone(&self.pool)).with_conflict_policy(self.conflict_policy))
    }

    pub fn articles(&self) -> ArticleRepository {
        SqlRepository::new(self.session())
    }
}
