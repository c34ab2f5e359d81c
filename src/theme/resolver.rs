// src/theme/resolver.rs
//
// View lookup strategies. One is chosen at startup and shared through
// application state; request handlers only ever see `dyn ViewResolver`.

use std::path::{Path, PathBuf};

use crate::theme::selection::{is_safe_name, ThemeSelection};

const VIEW_EXTENSION: &str = "html";

/// Finds the template file for a controller/view pair.
#[cfg_attr(test, mockall::automock)]
pub trait ViewResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// First existing template for the view, or `None`.
    fn locate(&self, controller: &str, view: &str, selection: &ThemeSelection) -> Option<PathBuf>;
}

/// Looks only in `{root}/Views`.
#[derive(Debug, Clone)]
pub struct DefaultViewResolver {
    root: PathBuf,
}

impl DefaultViewResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn candidates(&self, controller: &str, view: &str) -> Vec<PathBuf> {
        view_locations(&self.root.join("Views"), controller, view)
    }
}

impl ViewResolver for DefaultViewResolver {
    fn name(&self) -> &'static str {
        "default"
    }

    fn locate(&self, controller: &str, view: &str, _selection: &ThemeSelection) -> Option<PathBuf> {
        if !is_safe_name(controller) || !is_safe_name(view) {
            return None;
        }
        first_existing(self.candidates(controller, view))
    }
}

/// Looks in `{root}/Themes/{theme}/Views` first, then falls back to the
/// default locations.
#[derive(Debug, Clone)]
pub struct ThemeViewResolver {
    root: PathBuf,
    fallback: DefaultViewResolver,
}

impl ThemeViewResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            fallback: DefaultViewResolver::new(root.clone()),
            root,
        }
    }

    pub fn candidates(&self, controller: &str, view: &str, selection: &ThemeSelection) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if !selection.is_default_theme() {
            let themed = self.root.join("Themes").join(selection.theme()).join("Views");
            paths.extend(view_locations(&themed, controller, view));
        }
        paths.extend(self.fallback.candidates(controller, view));
        paths
    }
}

impl ViewResolver for ThemeViewResolver {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn locate(&self, controller: &str, view: &str, selection: &ThemeSelection) -> Option<PathBuf> {
        if !is_safe_name(controller) || !is_safe_name(view) {
            return None;
        }
        first_existing(self.candidates(controller, view, selection))
    }
}

fn view_locations(views_dir: &Path, controller: &str, view: &str) -> Vec<PathBuf> {
    let file = format!("{view}.{VIEW_EXTENSION}");
    vec![
        views_dir.join(controller).join(&file),
        views_dir.join("Shared").join(file),
    ]
}

fn first_existing(paths: Vec<PathBuf>) -> Option<PathBuf> {
    paths.into_iter().find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn web_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for (path, body) in [
            ("Views/Home/Index.html", "plain index"),
            ("Views/Shared/Layout.html", "plain layout"),
            ("Themes/dark/Views/Home/Index.html", "dark index"),
        ] {
            let full = root.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, body).unwrap();
        }
        dir
    }

    fn read(path: Option<PathBuf>) -> String {
        fs::read_to_string(path.expect("view should resolve")).unwrap()
    }

    #[test]
    fn test_theme_resolver_prefers_theme_folder() {
        let dir = web_root();
        let resolver = ThemeViewResolver::new(dir.path());
        let dark = ThemeSelection::new(Some("dark"), None);

        assert_eq!(read(resolver.locate("Home", "Index", &dark)), "dark index");
    }

    #[test]
    fn test_theme_resolver_falls_back_to_default_views() {
        let dir = web_root();
        let resolver = ThemeViewResolver::new(dir.path());
        let dark = ThemeSelection::new(Some("dark"), None);
        let missing = ThemeSelection::new(Some("ocean"), None);

        assert_eq!(read(resolver.locate("Home", "Layout", &dark)), "plain layout");
        assert_eq!(read(resolver.locate("Home", "Index", &missing)), "plain index");
        assert_eq!(
            read(resolver.locate("Home", "Index", &ThemeSelection::default())),
            "plain index"
        );
    }

    #[test]
    fn test_default_resolver_ignores_theme() {
        let dir = web_root();
        let resolver = DefaultViewResolver::new(dir.path());
        let dark = ThemeSelection::new(Some("dark"), None);

        assert_eq!(read(resolver.locate("Home", "Index", &dark)), "plain index");
    }

    #[test]
    fn test_unsafe_names_do_not_resolve() {
        let dir = web_root();
        let resolver = ThemeViewResolver::new(dir.path());

        assert!(resolver.locate("..", "Index", &ThemeSelection::default()).is_none());
        assert!(resolver.locate("Home", "../Index", &ThemeSelection::default()).is_none());
        assert!(resolver.locate("Home", "Missing", &ThemeSelection::default()).is_none());
    }
}
