use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use secrecy::ExposeSecret;
use service_core::error::AppError;
use subtle::ConstantTimeEq;
use uuid::{Uuid, uuid};
use validator::Validate;

use crate::AppState;
use crate::dtos::auth::{LoginRequest, WhoamiResponse};
use crate::middleware::CurrentSession;

// Single-user deployment: the user id is fixed and only the household is
// looked up. The placeholder household covers bootstrap before the row
// exists.
const SINGLE_USER_ID: Uuid = uuid!("00000000-0000-0000-0000-000000000001");
const PLACEHOLDER_HOUSEHOLD_ID: Uuid = uuid!("00000000-0000-0000-0000-0000000000aa");

/// POST /api/auth/login
///
/// Accepts JSON or a URL-encoded form. On success answers 204 with the
/// session cookie; any credential failure answers the same 401.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request = parse_login_body(&headers, &body)?;
    request.validate()?;

    let email_ok = state
        .config
        .login
        .allowed_emails
        .iter()
        .any(|allowed| allowed == &request.email);

    let expected = state.config.login.passphrase.expose_secret();
    let pass_ok = !expected.is_empty()
        && bool::from(request.passphrase.as_bytes().ct_eq(expected.as_bytes()));

    if !email_ok || !pass_ok {
        tracing::debug!(email_ok, "Login rejected");
        return Err(AppError::AuthError(anyhow::anyhow!("Invalid credentials")));
    }

    let household_id = match state
        .db
        .find_household_by_slug(&state.config.login.household_slug)
        .await
    {
        Ok(Some(household)) => household.id,
        Ok(None) => {
            tracing::warn!(
                slug = %state.config.login.household_slug,
                "Household not found, using placeholder id"
            );
            PLACEHOLDER_HOUSEHOLD_ID
        }
        Err(err) => {
            tracing::warn!(error = %err, "Household lookup failed, using placeholder id");
            PLACEHOLDER_HOUSEHOLD_ID
        }
    };

    let token = state
        .sessions
        .issue(SINGLE_USER_ID, household_id, &request.email)?;
    let jar = CookieJar::new().add(state.sessions.cookie(token));

    tracing::info!(household_id = %household_id, "Login succeeded");
    Ok((StatusCode::NO_CONTENT, jar))
}

fn parse_login_body(headers: &HeaderMap, body: &Bytes) -> Result<LoginRequest, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Json parse error: {}", e)))
    } else {
        serde_urlencoded::from_bytes(body)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Form parse error: {}", e)))
    }
}

/// POST /api/auth/logout
///
/// Sessionless on purpose: an expired session must still be clearable.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let jar = CookieJar::new().add(state.sessions.clear_cookie());
    (StatusCode::NO_CONTENT, jar)
}

/// GET /api/auth/whoami
pub async fn whoami(CurrentSession(session): CurrentSession) -> Json<WhoamiResponse> {
    Json(session.into())
}
