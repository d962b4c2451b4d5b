use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub floor: Option<String>,
    pub dimensions: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Slim projection used by the asset value report.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomHeader {
    pub id: Uuid,
    pub name: String,
    pub floor: Option<String>,
}
