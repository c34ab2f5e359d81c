// src/application/router_tests.rs
//
// End-to-end HTTP checks through the full router.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::{build_router, AppState, ArticleDto, ErrorResponse, ErrorType};
    use crate::db::{create_connection_pool, get_connection, initialize_database};
    use crate::repositories::ConflictPolicy;
    use crate::theme::resolver::MockViewResolver;
    use crate::theme::{select_view_resolver, ViewResolver};

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    struct Site {
        _dir: tempfile::TempDir,
        web_root: PathBuf,
        state: AppState,
    }

    impl Site {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let web_root = dir.path().join("web");
            write_views(&web_root);

            let pool = create_connection_pool(&dir.path().join("site.db"), 4).unwrap();
            initialize_database(&get_connection(&pool).unwrap()).unwrap();

            let state = AppState::new(
                Arc::new(pool),
                ConflictPolicy::Ignore,
                select_view_resolver(true, &web_root),
            );
            Self {
                _dir: dir,
                web_root,
                state,
            }
        }

        fn with_views(mut self, views: Arc<dyn ViewResolver>) -> Self {
            self.state.views = views;
            self
        }

        fn router(&self) -> Router {
            build_router(self.state.clone(), &self.web_root)
        }

        async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(json) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            self.router().oneshot(request).await.unwrap()
        }

        async fn create(&self, title: &str, slug: &str) -> ArticleDto {
            let response = self
                .send(
                    Method::POST,
                    "/articles",
                    Some(json!({ "title": title, "slug": slug, "author": "ada" })),
                )
                .await;
            assert_eq!(response.status(), StatusCode::CREATED);
            json_body(response).await
        }
    }

    fn write_views(root: &Path) {
        for (path, body) in [
            (
                "Views/Home/Index.html",
                r#"<link href="{{style}}"><p>plain index</p>"#,
            ),
            (
                "Themes/dark/Views/Home/Index.html",
                r#"<link href="{{style}}"><img src="{{content:~/img/logo.png}}"><p>{{theme}} index</p>"#,
            ),
            ("Themes/dark/Content/default.css", "body { background: #000; }"),
            ("Content/default.css", "body { background: #fff; }"),
        ] {
            let full = root.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, body).unwrap();
        }
    }

    async fn text_body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ========================================================================
    // ARTICLES
    // ========================================================================

    #[tokio::test]
    async fn test_health() {
        let site = Site::new();
        let response = site.send(Method::GET, "/health", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text_body(response).await, "OK");
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let site = Site::new();
        let created = site.create("Hello", "hello").await;
        assert!(created.id > 0);

        let response = site
            .send(Method::GET, &format!("/articles/{}", created.id), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let fetched: ArticleDto = json_body(response).await;
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_invalid_article_is_unprocessable() {
        let site = Site::new();
        let response = site
            .send(
                Method::POST,
                "/articles",
                Some(json!({ "title": "", "slug": "Bad Slug", "author": "ada" })),
            )
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = json_body(response).await;
        assert_eq!(error.error_type, ErrorType::Validation);
        let details = error.details.unwrap();
        assert!(details.contains("title"));
        assert!(details.contains("slug"));
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_unprocessable() {
        let site = Site::new();
        site.create("First", "taken").await;

        let response = site
            .send(
                Method::POST,
                "/articles",
                Some(json!({ "title": "Second", "slug": "taken", "author": "ada" })),
            )
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = json_body(response).await;
        assert_eq!(error.error_type, ErrorType::Validation);
        assert!(error.details.unwrap().contains("field: slug"));
    }

    #[tokio::test]
    async fn test_missing_article_is_not_found() {
        let site = Site::new();
        let response = site.send(Method::GET, "/articles/77", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_pages() {
        let site = Site::new();
        for n in 1..=3 {
            site.create(&format!("Post {n}"), &format!("post-{n}")).await;
        }

        let response = site
            .send(Method::GET, "/articles?page=2&size=2", None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let page: Value = json_body(response).await;
        assert_eq!(page["total"], 3);
        assert_eq!(page["page"], 2);
        assert_eq!(page["pages"], 2);
        assert_eq!(page["items"].as_array().unwrap().len(), 1);
        assert_eq!(page["items"][0]["slug"], "post-3");
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_sort_and_zero_page() {
        let site = Site::new();

        let response = site
            .send(Method::GET, "/articles?sort=rating", None)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = site.send(Method::GET, "/articles?page=0", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_stale_update() {
        let site = Site::new();
        let created = site.create("Draft", "draft").await;
        let uri = format!("/articles/{}", created.id);

        let response = site
            .send(
                Method::PUT,
                &uri,
                Some(json!({ "version": created.version, "title": "Final", "published": true })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: ArticleDto = json_body(response).await;
        assert_eq!(updated.title, "Final");
        assert!(updated.published);
        assert_eq!(updated.version, created.version + 1);

        let response = site
            .send(
                Method::PUT,
                &uri,
                Some(json!({ "version": created.version, "title": "Lost" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_delete() {
        let site = Site::new();
        let created = site.create("Gone", "gone").await;
        let uri = format!("/articles/{}", created.id);

        let response = site.send(Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = site.send(Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = site.send(Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // ========================================================================
    // VIEWS + THEMES
    // ========================================================================

    #[tokio::test]
    async fn test_default_view() {
        let site = Site::new();
        let response = site.send(Method::GET, "/views/Home/Index", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = text_body(response).await;
        assert!(html.contains("plain index"));
        assert!(html.contains(r#"href="/Content/default.css""#));
    }

    #[tokio::test]
    async fn test_themed_view_rewrites_asset_urls() {
        let site = Site::new();
        let response = site
            .send(Method::GET, "/views/Home/Index?theme=dark", None)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = text_body(response).await;
        assert!(html.contains("dark index"));
        assert!(html.contains(r#"href="/Themes/dark/Content/default.css""#));
        assert!(html.contains(r#"src="/Themes/dark/img/logo.png""#));
    }

    #[tokio::test]
    async fn test_unknown_theme_falls_back_to_default_views() {
        let site = Site::new();
        let response = site
            .send(Method::GET, "/views/Home/Index?theme=ocean", None)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(text_body(response).await.contains("plain index"));
    }

    #[tokio::test]
    async fn test_theme_assets_are_served() {
        let site = Site::new();
        let response = site
            .send(Method::GET, "/Themes/dark/Content/default.css", None)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(text_body(response).await.contains("#000"));
    }

    #[tokio::test]
    async fn test_handler_uses_installed_resolver() {
        let mut mock = MockViewResolver::new();
        mock.expect_locate()
            .withf(|controller, view, selection| {
                controller.to_string() == "Blog"
                    && view.to_string() == "Post"
                    && selection.theme() == "dark"
            })
            .times(1)
            .returning(|_, _, _| None);

        let site = Site::new().with_views(Arc::new(mock));
        let response = site
            .send(Method::GET, "/views/Blog/Post?theme=dark", None)
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_default_resolver_ignores_theme_folder() {
        let site = Site::new();
        let views = select_view_resolver(false, &site.web_root);
        let site = site.with_views(views);

        let response = site
            .send(Method::GET, "/views/Home/Index?theme=dark", None)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = text_body(response).await;
        assert!(html.contains("plain index"));
        assert!(html.contains(r#"href="/Themes/dark/Content/default.css""#));
    }
}
