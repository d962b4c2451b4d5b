use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Rewrites the router's bare 405 responses so the body carries the
/// plain-text phrase clients match on. Applied with
/// `axum::middleware::map_response` at the outermost router.
pub async fn method_not_allowed_body(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    }
    response
}
