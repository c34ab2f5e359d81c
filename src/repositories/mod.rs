// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO cross-repository calls
// - Explicit SQL only, values always bound

pub mod article_repository;
pub mod entity;
pub mod error;
pub mod query;
pub mod repository;
pub mod session;


pub use article_repository::ArticleRepository;
pub use entity::{Entity, EntityId};
pub use error::{RepoError, RepoResult, ValidationErrors};
pub use query::{Comparison, Filter, Page, PageRequest, Query, SortDirection};
pub use repository::{Repository, SqlRepository};
pub use session::{ConflictPolicy, DbSession};
