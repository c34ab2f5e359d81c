// src/application/router.rs

use std::path::Path;

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::application::commands::*;
use crate::application::state::AppState;

/// All routes of the site.
///
/// Static assets are served straight from `{web_root}/Themes` and
/// `{web_root}/Content`, matching the URLs `theme_content` produces.
pub fn build_router(state: AppState, web_root: &Path) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/articles", get(list_articles).post(create_article))
        .route(
            "/articles/:id",
            get(get_article).put(update_article).delete(delete_article),
        )
        .route("/views/:controller/:view", get(render_view))
        .nest_service("/Themes", ServeDir::new(web_root.join("Themes")))
        .nest_service("/Content", ServeDir::new(web_root.join("Content")))
        .with_state(state)
}
