//! Single-page application fallback.
//!
//! Requests the public directory cannot satisfy end up here. Paths without a
//! `.` are client-side routes and get the index page so the in-page router
//! can take over; anything else is a genuine miss and gets the not-found page.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use crate::config::StaticConfig;
use crate::http::response::Served;

/// Pages read once at startup.
#[derive(Debug, Clone, Default)]
pub struct Pages {
    index: Option<String>,
    not_found: Option<String>,
}

impl Pages {
    /// Read the index and not-found pages from the public directory. Missing pages are tolerated.
    pub fn load(config: &StaticConfig) -> Self {
        Self {
            index: read_page(&config.root, &config.index),
            not_found: read_page(&config.root, &config.not_found),
        }
    }

    pub fn new(index: Option<String>, not_found: Option<String>) -> Self {
        Self { index, not_found }
    }
}

fn read_page(root: &Path, name: &str) -> Option<String> {
    let path = root.join(name);
    match std::fs::read_to_string(&path) {
        Ok(page) => Some(page),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Page unavailable, using built-in body");
            None
        }
    }
}

/// Whether a path looks like a client-side route rather than a file.
pub fn is_client_route(path: &str) -> bool {
    !path.contains('.')
}

/// Handler for requests that matched no file.
pub async fn spa_fallback(State(pages): State<Arc<Pages>>, method: Method, uri: Uri) -> Response {
    if is_client_route(uri.path()) {
        let body = pages.index.clone().unwrap_or_else(|| "<pre></pre>".to_string());
        return Served::Fallback.tag((StatusCode::OK, Html(body)).into_response());
    }

    let body = pages.not_found.clone().unwrap_or_else(|| {
        let target = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
        format!("<pre>{} {} Not Found</pre>", method, escape_html(target))
    });
    Served::NotFound.tag((StatusCode::NOT_FOUND, Html(body)).into_response())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::Router;
    use tower::ServiceExt;

    fn router(pages: Pages) -> Router {
        Router::new()
            .fallback(spa_fallback)
            .with_state(Arc::new(pages))
    }

    async fn fetch(router: Router, method: Method, uri: &str) -> (StatusCode, String, Option<Served>) {
        let response = router
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let served = response.extensions().get::<Served>().copied();
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), served)
    }

    #[test]
    fn test_is_client_route() {
        assert!(is_client_route("/task/42"));
        assert!(is_client_route("/"));
        assert!(!is_client_route("/app.js"));
        assert!(!is_client_route("/v1.2/notes"));
    }

    #[tokio::test]
    async fn test_route_gets_index() {
        let pages = Pages::new(Some("<main id=app></main>".into()), Some("gone".into()));
        let (status, body, served) = fetch(router(pages), Method::GET, "/task/42?x=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<main id=app></main>");
        assert_eq!(served, Some(Served::Fallback));
    }

    #[tokio::test]
    async fn test_missing_file_gets_not_found_page() {
        let pages = Pages::new(Some("index".into()), Some("gone".into()));
        let (status, body, served) = fetch(router(pages), Method::GET, "/missing.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "gone");
        assert_eq!(served, Some(Served::NotFound));
    }

    #[tokio::test]
    async fn test_builtin_bodies() {
        let (status, body, _) = fetch(router(Pages::default()), Method::GET, "/task").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<pre></pre>");

        let (status, body, _) = fetch(router(Pages::default()), Method::POST, "/logo.png?v=2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "<pre>POST /logo.png?v=2 Not Found</pre>");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("/a.js?<b>&\"'"), "/a.js?&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn test_load_pages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "home").unwrap();
        let config = StaticConfig {
            root: dir.path().to_path_buf(),
            ..StaticConfig::default()
        };
        let pages = Pages::load(&config);
        assert_eq!(pages.index.as_deref(), Some("home"));
        assert!(pages.not_found.is_none());
    }
}
