use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

use crate::dtos::ErrorResponse;

/// JSON extractor that also runs `validator` rules. Both parse and
/// validation failures answer 400 with the error envelope.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|err| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Json parse error: {}", err.body_text()),
                    details: None,
                }),
            )
                .into_response()
        })?;

        value
            .validate()
            .map_err(|err| AppError::ValidationError(err).into_response())?;

        Ok(ValidatedJson(value))
    }
}
