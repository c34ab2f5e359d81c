// src/theme/selection.rs
//
// Per-request theme choice, derived from the query string.

use std::collections::HashMap;
use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Serialize;

use crate::theme::{DEFAULT_STYLE, DEFAULT_THEME, THEME_PATH};

/// The theme and style a request asked for.
///
/// Values that are missing, empty, or not a plain name fall back to
/// `"default"`, so a selection can always be joined onto a path safely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSelection {
    theme: String,
    style: String,
}

impl Default for ThemeSelection {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            style: DEFAULT_STYLE.to_string(),
        }
    }
}

impl ThemeSelection {
    pub fn new(theme: Option<&str>, style: Option<&str>) -> Self {
        Self {
            theme: sanitize(theme, DEFAULT_THEME),
            style: sanitize(style, DEFAULT_STYLE),
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn is_default_theme(&self) -> bool {
        self.theme == DEFAULT_THEME
    }

    /// Stylesheet for the selected style inside the selected theme.
    pub fn stylesheet_url(&self) -> String {
        if self.is_default_theme() {
            format!("/Content/{}.css", self.style)
        } else {
            format!("{THEME_PATH}{}/Content/{}.css", self.theme, self.style)
        }
    }

    fn from_query(params: &HashMap<String, String>) -> Self {
        Self::new(
            params.get("theme").map(String::as_str),
            params.get("style").map(String::as_str),
        )
    }
}

/// Plain names only: ascii alphanumerics, '-' and '_'.
pub(crate) fn is_safe_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn sanitize(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if is_safe_name(v) => v.to_string(),
        _ => fallback.to_string(),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ThemeSelection
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let selection = match Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
            Ok(Query(params)) => Self::from_query(&params),
            Err(_) => Self::default(),
        };
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> ThemeSelection {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ThemeSelection::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_absent() {
        let selection = extract("/views/home/index").await;
        assert_eq!(selection.theme(), "default");
        assert_eq!(selection.style(), "default");
        assert!(selection.is_default_theme());
    }

    #[tokio::test]
    async fn test_reads_theme_and_style() {
        let selection = extract("/views/home/index?theme=dark&style=compact").await;
        assert_eq!(selection.theme(), "dark");
        assert_eq!(selection.style(), "compact");
    }

    #[tokio::test]
    async fn test_empty_and_unsafe_values_fall_back() {
        let selection = extract("/?theme=&style=..%2F..%2Fetc").await;
        assert_eq!(selection, ThemeSelection::default());
    }

    #[test]
    fn test_stylesheet_url() {
        assert_eq!(
            ThemeSelection::new(None, Some("blue")).stylesheet_url(),
            "/Content/blue.css"
        );
        assert_eq!(
            ThemeSelection::new(Some("dark"), None).stylesheet_url(),
            "/Themes/dark/Content/default.css"
        );
    }
}
