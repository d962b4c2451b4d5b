use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::ItemSuggestion;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractKind {
    /// Clean a free-form grocery note into discrete items.
    #[default]
    Shopping,
    /// Condense a room note into a single table-of-contents line.
    Toc,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExtractRequest {
    #[validate(length(min = 1, message = "text required"))]
    pub text: String,
    #[serde(default)]
    pub kind: ExtractKind,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub items: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScanRequest {
    pub photo_id: Uuid,
    pub room_id: Uuid,
    /// Bypass the suggestion cache and call the vision model again.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub items: Vec<ItemSuggestion>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
}
