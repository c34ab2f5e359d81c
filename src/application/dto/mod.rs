// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// - DTOs are the JSON shapes of the HTTP surface
// - Conversion FROM domain entities for responses, TO them for requests

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::Article;
use crate::repositories::{Filter, Page, PageRequest, Query, SortDirection};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// ARTICLE DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDto {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub author: String,
    pub published: bool,
    pub views: i64,
    pub version: i64,
    pub created_at: String,
}

impl From<Article> for ArticleDto {
    fn from(article: Article) -> Self {
        Self {
            id: article.id.unwrap_or_default(),
            title: article.title,
            slug: article.slug,
            body: article.body,
            author: article.author,
            published: article.published,
            views: article.views,
            version: article.version,
            created_at: article.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArticleDto {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub body: String,
    pub author: String,
    #[serde(default)]
    pub published: bool,
}

impl From<CreateArticleDto> for Article {
    fn from(dto: CreateArticleDto) -> Self {
        Article {
            id: None,
            title: dto.title,
            slug: dto.slug,
            body: dto.body,
            author: dto.author,
            published: dto.published,
            views: 0,
            version: 0,
            created_at: Utc::now(),
        }
    }
}

/// Partial update. `version` must match the stored row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateArticleDto {
    pub version: i64,
    pub title: Option<String>,
    pub body: Option<String>,
    pub published: Option<bool>,
}

impl UpdateArticleDto {
    pub fn apply_to(self, article: &mut Article) {
        article.version = self.version;
        if let Some(title) = self.title {
            article.title = title;
        }
        if let Some(body) = self.body {
            article.body = body;
        }
        if let Some(published) = self.published {
            article.published = published;
        }
    }
}

// ============================================================================
// LISTING
// ============================================================================

/// `GET /articles` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub dir: Option<SortDirection>,
    pub author: Option<String>,
    pub published: Option<bool>,
}

impl ArticleListParams {
    pub fn to_page_request(&self) -> PageRequest {
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);

        let mut filters = Vec::new();
        if let Some(author) = &self.author {
            filters.push(Filter::eq("author", author.clone()));
        }
        if let Some(published) = self.published {
            filters.push(Filter::eq("published", published));
        }

        let mut query = Query::new();
        if !filters.is_empty() {
            query = query.filter(Filter::And(filters));
        }
        if let Some(sort) = &self.sort {
            query = query.order_by(sort.clone(), self.dir.unwrap_or(SortDirection::Asc));
        } else if let Some(dir) = self.dir {
            query.direction = dir;
        }

        PageRequest::new(self.page.unwrap_or(1), size).with_query(query)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u64,
}

impl<T, U: From<T>> From<Page<T>> for PageDto<U> {
    fn from(page: Page<T>) -> Self {
        let pages = page.page_count();
        Self {
            items: page.items.into_iter().map(U::from).collect(),
            total: page.total,
            page: page.index,
            size: page.size,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let request = ArticleListParams::default().to_page_request();
        assert_eq!(request.index, 1);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.query, Query::default());
    }

    #[test]
    fn test_list_params_build_filter_and_sort() {
        let params = ArticleListParams {
            page: Some(2),
            size: Some(500),
            sort: Some("views".to_string()),
            dir: Some(SortDirection::Desc),
            author: Some("ada".to_string()),
            published: None,
        };
        let request = params.to_page_request();

        assert_eq!(request.index, 2);
        assert_eq!(request.size, MAX_PAGE_SIZE);
        assert_eq!(request.query.sort_key.as_deref(), Some("views"));
        assert_eq!(request.query.direction, SortDirection::Desc);
        assert_eq!(
            request.query.filter,
            Some(Filter::And(vec![Filter::eq("author", "ada".to_string())]))
        );
    }

    #[test]
    fn test_update_dto_only_touches_given_fields() {
        let mut article = Article::new("Old", "old", "ada").with_body("body");
        UpdateArticleDto {
            version: 3,
            title: Some("New".to_string()),
            body: None,
            published: Some(true),
        }
        .apply_to(&mut article);

        assert_eq!(article.title, "New");
        assert_eq!(article.body, "body");
        assert!(article.published);
        assert_eq!(article.version, 3);
    }
}
