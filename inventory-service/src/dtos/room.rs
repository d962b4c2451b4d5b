use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create when `id` is absent, full-row update when present.
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertRoomRequest {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub floor: Option<String>,
    pub dimensions: Option<String>,
    pub notes: Option<String>,
}
