// src/theme/mod.rs
//
// Theme management
//
// - The theme and style come from the request (`?theme=&style=`), never from
//   shared state. Both default to "default".
// - The view lookup strategy is picked once, at startup.
// - Asset URLs are rewritten into `/Themes/{theme}/` for non-default themes.

pub mod content;
pub mod resolver;
pub mod selection;

use std::path::Path;
use std::sync::Arc;

pub use content::{expand_placeholders, resolve_app_relative, theme_content};
pub use resolver::{DefaultViewResolver, ThemeViewResolver, ViewResolver};
pub use selection::ThemeSelection;

/// URL prefix (and folder name under the web root) holding the themes.
pub const THEME_PATH: &str = "/Themes/";

pub const DEFAULT_THEME: &str = "default";

pub const DEFAULT_STYLE: &str = "default";

/// Build the process-wide view resolver.
pub fn select_view_resolver(themes_enabled: bool, web_root: &Path) -> Arc<dyn ViewResolver> {
    let resolver: Arc<dyn ViewResolver> = if themes_enabled {
        Arc::new(ThemeViewResolver::new(web_root))
    } else {
        Arc::new(DefaultViewResolver::new(web_root))
    };
    log::info!(
        "Installed `{}` view resolver rooted at {}",
        resolver.name(),
        web_root.display()
    );
    resolver
}
