// src/domain/article/mod.rs
//
//! Article invariants:
//!
//! 1. Title is not blank and at most 200 characters
//! 2. Slug is non-empty lowercase ascii, digits and '-'
//! 3. Author is not blank
//! 4. View counter never goes negative

pub mod entity;
pub mod invariants;

pub use entity::Article;
pub use invariants::validate_article;
