use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomPhoto {
    pub id: Uuid,
    pub storage_path: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub storage_path: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomTocEntry {
    pub id: Uuid,
    pub line: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Ownership projection for the scan endpoint. Fetched unscoped so the
/// handler can distinguish a missing photo from one in another household.
#[derive(Debug, Clone, FromRow)]
pub struct PhotoRef {
    pub id: Uuid,
    pub household_id: Uuid,
    pub room_id: Uuid,
    pub storage_path: String,
}
