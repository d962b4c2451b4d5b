use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub purchase_price: Option<f64>,
    pub room_id: Option<Uuid>,
}

/// Projection for summing asset values by room.
#[derive(Debug, Clone, FromRow)]
pub struct AssetValue {
    pub room_id: Uuid,
    pub purchase_price: Option<f64>,
}
