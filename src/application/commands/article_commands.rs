// src/application/commands/article_commands.rs
//
// Article Handlers
//
// RULES:
// - Accept DTOs
// - Call the repository
// - Return DTOs

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::dto::*;
use crate::application::state::AppState;
use crate::domain::Article;
use crate::error::{AppError, AppResult};
use crate::repositories::{Entity, RepoError, Repository};

/// List one page of articles
pub async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ArticleListParams>,
) -> AppResult<Json<PageDto<ArticleDto>>> {
    let page = state.articles().find_page(params.to_page_request()).await?;
    Ok(Json(PageDto::from(page)))
}

/// Get a single article by ID
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ArticleDto>> {
    let article = state
        .articles()
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(ArticleDto::from(article)))
}

/// Create a new article
pub async fn create_article(
    State(state): State<AppState>,
    Json(dto): Json<CreateArticleDto>,
) -> AppResult<(StatusCode, Json<ArticleDto>)> {
    let article = state.articles().add(Article::from(dto), true).await?;
    log::info!("Created article {}", article);

    Ok((StatusCode::CREATED, Json(ArticleDto::from(article))))
}

/// Update an existing article; a stale `version` is a conflict
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateArticleDto>,
) -> AppResult<Json<ArticleDto>> {
    let repo = state.articles();
    let mut article = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    dto.apply_to(&mut article);

    if !repo.update(article, true).await? {
        return Err(RepoError::Conflict {
            table: Article::TABLE,
        }
        .into());
    }

    let updated = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(ArticleDto::from(updated)))
}

/// Delete an article
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let repo = state.articles();
    let article = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    if !repo.delete(article, true).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
