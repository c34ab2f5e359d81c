// src/repositories/article_repository.rs
//
// Article persistence mapping

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::Row;

use crate::domain::{validate_article, Article, FieldError};
use crate::repositories::entity::{Entity, EntityId};
use crate::repositories::repository::SqlRepository;

pub type ArticleRepository = SqlRepository<Article>;

impl Entity for Article {
    const TABLE: &'static str = "articles";
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "slug",
        "body",
        "author",
        "published",
        "views",
        "version",
        "created_at",
    ];
    const VERSION: Option<&'static str> = Some("version");

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.title.clone()),
            Value::Text(self.slug.clone()),
            Value::Text(self.body.clone()),
            Value::Text(self.author.clone()),
            Value::from(self.published),
            Value::Integer(self.views),
            Value::Integer(self.version),
            Value::Text(self.created_at.to_rfc3339()),
        ]
    }

    /// Map database row to Article - returns rusqlite::Error for query_map compatibility
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let created_at_str: String = row.get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e)))?;

        Ok(Article {
            id: Some(row.get("id")?),
            title: row.get("title")?,
            slug: row.get("slug")?,
            body: row.get("body")?,
            author: row.get("author")?,
            published: row.get("published")?,
            views: row.get("views")?,
            version: row.get("version")?,
            created_at,
        })
    }

    fn validate(&self) -> Vec<FieldError> {
        validate_article(self)
    }

    fn version(&self) -> Option<i64> {
        Some(self.version)
    }
}
