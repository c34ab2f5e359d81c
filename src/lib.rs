// src/lib.rs
// Quill - generic async repository and themed presentation for a small CMS
//
// Architecture:
// - Repository: typed CRUD/paging over a unit-of-work session (SQLite)
// - Theme: per-request theme selection, view lookup strategy, asset URLs
// - Application: axum handlers wiring both together

pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod repositories;
pub mod theme;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use config::AppConfig;
pub use domain::{Article, FieldError};
pub use error::{AppError, AppResult};

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

pub use repositories::{
    ArticleRepository, Comparison, ConflictPolicy, DbSession, Entity, EntityId, Filter, Page,
    PageRequest, Query, RepoError, RepoResult, Repository, SortDirection, SqlRepository,
    ValidationErrors,
};

pub use theme::{
    select_view_resolver, theme_content, DefaultViewResolver, ThemeSelection, ThemeViewResolver,
    ViewResolver,
};

pub use application::{build_router, AppState};
