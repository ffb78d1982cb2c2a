//! Security headers middleware.

use axum::{
    body::Body,
    http::{header::HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Security headers middleware.
///
/// Adds the following headers to all responses:
/// - X-Frame-Options: SAMEORIGIN
/// - X-DNS-Prefetch-Control: off
/// - Referrer-Policy: same-origin
pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    // Only this site may frame its pages
    headers.insert("X-Frame-Options", HeaderValue::from_static("SAMEORIGIN"));

    headers.insert("X-DNS-Prefetch-Control", HeaderValue::from_static("off"));

    // Never leak the page URL to other sites
    headers.insert("Referrer-Policy", HeaderValue::from_static("same-origin"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::util::ServiceExt;

    async fn dummy_handler() -> &'static str {
        "OK"
    }

    #[tokio::test]
    async fn test_security_headers_added() {
        use axum::middleware;

        let app = Router::new()
            .route("/", get(dummy_handler))
            .layer(middleware::from_fn(security_headers));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "SAMEORIGIN");
        assert_eq!(headers.get("X-DNS-Prefetch-Control").unwrap(), "off");
        assert_eq!(headers.get("Referrer-Policy").unwrap(), "same-origin");
    }
}
