use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{SharedList, SharedListItem, ShoppingListHeader, ShoppingListItem};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateShoppingListRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "At least one item is required"))]
    #[validate(nested)]
    pub items: Vec<ShoppingListItemInput>,
    /// Stamp today's date as `last_bought` for every item on the new list.
    #[serde(default, rename = "setLastBoughtOnSave")]
    pub set_last_bought_on_save: bool,
}

/// Incoming list item. `id` is the client's stable item key, not a row id.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ShoppingListItemInput {
    #[validate(length(min = 1, message = "Item key is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShoppingListDetail {
    #[serde(flatten)]
    pub list: ShoppingListHeader,
    pub items: Vec<ShoppingListItem>,
}

#[derive(Debug, Serialize)]
pub struct SharedListDetail {
    #[serde(flatten)]
    pub list: SharedList,
    pub items: Vec<SharedListItem>,
}

#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    /// Share token, as handed out at list creation.
    pub t: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ToggleItemRequest {
    pub item_id: Uuid,
    pub checked: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertItemMetaRequest {
    #[validate(length(min = 1, message = "Item key is required"))]
    pub item_key: String,
    pub favorite: Option<bool>,
    pub last_bought: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct MetaListQuery {
    pub favorites: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetScope {
    #[default]
    All,
    Favorites,
    Dates,
}

#[derive(Debug, Deserialize)]
pub struct MetaResetQuery {
    #[serde(default)]
    pub scope: ResetScope,
}
