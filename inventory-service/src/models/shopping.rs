use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShoppingList {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row returned when a list is created. The share token comes from the
/// database default on insert.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShoppingListCreated {
    pub id: Uuid,
    pub share_token: String,
    pub description: Option<String>,
}

/// Projection for the list-detail endpoint.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShoppingListHeader {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShoppingListItem {
    pub id: Uuid,
    pub item_key: String,
    pub name: String,
    pub source: Option<String>,
    pub checked: bool,
}

/// List header for the read-only share view.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SharedList {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Item projection for the share view; internal keys are not exposed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SharedListItem {
    pub id: Uuid,
    pub name: String,
    pub source: Option<String>,
    pub checked: bool,
}

/// Per-household item preferences keyed by the stable item key.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShoppingItemMeta {
    pub item_key: String,
    pub favorite: bool,
    pub last_bought: Option<NaiveDate>,
}

/// Minimal lookup used by the toggle ownership check.
#[derive(Debug, Clone, FromRow)]
pub struct ShoppingItemRef {
    pub id: Uuid,
    pub list_id: Uuid,
}
