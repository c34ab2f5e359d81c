// src/domain/article/entity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published or draft piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Store-assigned identity, `None` until first insert
    pub id: Option<i64>,

    pub title: String,

    /// URL-safe unique handle
    pub slug: String,

    pub body: String,

    pub author: String,

    pub published: bool,

    pub views: i64,

    /// Optimistic-concurrency token, bumped by the store on every update
    pub version: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Article {
    /// Create a new unsaved draft.
    pub fn new(title: impl Into<String>, slug: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            slug: slug.into(),
            body: String::new(),
            author: author.into(),
            published: false,
            views: 0,
            version: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn publish(&mut self) {
        self.published = true;
    }
}

impl std::fmt::Display for Article {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.slug)
    }
}
