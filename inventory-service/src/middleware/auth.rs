use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use service_core::error::AppError;

use crate::AppState;
use crate::services::{SESSION_COOKIE, SessionClaims};

/// Gates a route group on a valid session cookie. Verified claims are
/// stashed in request extensions for handlers to extract.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(request.headers());
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| {
            tracing::debug!("Session rejected: no cookie");
            AppError::AuthError(anyhow::anyhow!("Unauthorized"))
        })?;

    let claims = state.sessions.verify(&token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Extractor handing the verified session to handlers behind
/// `session_middleware`.
pub struct CurrentSession(pub SessionClaims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| AppError::AuthError(anyhow::anyhow!("Unauthorized")))
    }
}
