// src/application/commands/view_commands.rs
//
// Themed view handler. Templates are served as files; the only processing
// is asset-URL placeholder expansion for the request's theme.

use axum::extract::{Path, State};
use axum::response::Html;

use crate::application::state::AppState;
use crate::error::{AppError, AppResult};
use crate::theme::{expand_placeholders, ThemeSelection};

pub async fn render_view(
    State(state): State<AppState>,
    Path((controller, view)): Path<(String, String)>,
    selection: ThemeSelection,
) -> AppResult<Html<String>> {
    let path = state
        .views
        .locate(&controller, &view, &selection)
        .ok_or(AppError::NotFound)?;

    log::debug!(
        "View {}/{} for theme `{}` resolved to {}",
        controller,
        view,
        selection.theme(),
        path.display()
    );

    let template = tokio::fs::read_to_string(&path).await?;
    Ok(Html(expand_placeholders(&template, &selection)))
}
