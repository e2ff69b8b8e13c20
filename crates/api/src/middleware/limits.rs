use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Replace axum's default 2 MiB body cap with a configurable one that also
/// covers multipart uploads.
pub fn with_body_limit(router: Router, max_bytes: usize) -> Router {
    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_bytes))
}
