use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::services::SessionClaims;

/// Login body, accepted as JSON or a URL-encoded form.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Passphrase must be at least 6 characters"))]
    pub passphrase: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WhoamiResponse {
    pub user_id: Uuid,
    pub household_id: Uuid,
    pub email: String,
    pub exp: i64,
}

impl From<SessionClaims> for WhoamiResponse {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            household_id: claims.household_id,
            email: claims.email,
            exp: claims.exp,
        }
    }
}
