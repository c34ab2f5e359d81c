// src/theme/content.rs
//
// Asset URL rewriting for the active theme.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::theme::selection::ThemeSelection;
use crate::theme::THEME_PATH;

static CONTENT_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*content:\s*([^}\s]+)\s*\}\}").expect("content placeholder pattern is valid")
});

/// Resolve `~/` to the site root.
pub fn resolve_app_relative(url: &str) -> Cow<'_, str> {
    match url.strip_prefix('~') {
        Some("") => Cow::Borrowed("/"),
        Some(rest) if rest.starts_with('/') => Cow::Borrowed(rest),
        _ => Cow::Borrowed(url),
    }
}

/// Point an asset URL into the selected theme's folder.
///
/// The default theme leaves the path alone. Otherwise `Themes/{theme}/` is
/// spliced in right after the leading separator:
/// `/img/logo.png` becomes `/Themes/dark/img/logo.png`.
/// URLs without a leading single `/` (relative, absolute or protocol
/// relative) are returned as-is.
pub fn theme_content(url: &str, selection: &ThemeSelection) -> String {
    let resolved = resolve_app_relative(url);
    if selection.is_default_theme() {
        return resolved.into_owned();
    }

    if let Some(rest) = resolved.strip_prefix('/').filter(|r| !r.starts_with('/')) {
        return format!("{THEME_PATH}{}/{rest}", selection.theme());
    }
    resolved.into_owned()
}

/// Replace asset placeholders in a view:
/// - `{{content:/img/logo.png}}` with the themed URL
/// - `{{style}}` with the stylesheet URL
/// - `{{theme}}` with the theme name
pub fn expand_placeholders(template: &str, selection: &ThemeSelection) -> String {
    let expanded = CONTENT_PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        theme_content(&caps[1], selection)
    });
    expanded
        .replace("{{style}}", &selection.stylesheet_url())
        .replace("{{theme}}", selection.theme())
}
