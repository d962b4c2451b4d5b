use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertAssetRequest {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub category: Option<String>,
    pub purchase_price: Option<f64>,
    pub room_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetIdResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AssetListQuery {
    pub room_id: Option<Uuid>,
}
