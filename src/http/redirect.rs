//! Plain HTTP to HTTPS redirect.
//!
//! When TLS is configured, the plain listener answers every request with a
//! permanent redirect to the same host on the HTTPS port.

use axum::{
    extract::State,
    http::{header, uri::Authority, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::http::response::Served;

/// Target of the redirect for `host` (a Host header value) and `uri`.
///
/// The port of `host` is replaced by `https_port`, which is omitted when 443.
pub fn https_location(host: &str, https_port: u16, uri: &Uri) -> Option<String> {
    let authority: Authority = host.parse().ok()?;
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    let location = if https_port == 443 {
        format!("https://{}{}", authority.host(), path)
    } else {
        format!("https://{}:{}{}", authority.host(), https_port, path)
    };
    Some(location)
}

/// Redirect handler. The state is the HTTPS port.
pub async fn redirect_to_https(State(https_port): State<u16>, headers: HeaderMap, uri: Uri) -> Response {
    let location = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .and_then(|host| https_location(host, https_port, &uri));

    match location {
        Some(location) => Served::Redirect.tag(
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response(),
        ),
        None => (StatusCode::BAD_REQUEST, "Missing or invalid Host header").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use tower::ServiceExt;

    #[test]
    fn test_https_location() {
        let uri: Uri = "/task/42?x=1".parse().unwrap();
        assert_eq!(
            https_location("localhost:8080", 8443, &uri).as_deref(),
            Some("https://localhost:8443/task/42?x=1")
        );
        assert_eq!(
            https_location("example.com", 443, &uri).as_deref(),
            Some("https://example.com/task/42?x=1")
        );
        assert_eq!(
            https_location("[::1]:80", 8443, &"/".parse().unwrap()).as_deref(),
            Some("https://[::1]:8443/")
        );
        assert_eq!(https_location("bad host", 443, &uri), None);
    }

    #[tokio::test]
    async fn test_redirect_handler() {
        let router = Router::new().fallback(redirect_to_https).with_state(8443u16);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/settings")
                    .header("host", "localhost:8080")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://localhost:8443/settings"
        );
        assert_eq!(response.extensions().get::<Served>(), Some(&Served::Redirect));

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
