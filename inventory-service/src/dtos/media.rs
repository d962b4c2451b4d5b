use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Document, RoomPhoto};
use crate::services::{DOCS_BUCKET, PHOTOS_BUCKET};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Doc,
}

impl MediaKind {
    pub fn bucket(&self) -> &'static str {
        match self {
            MediaKind::Photo => PHOTOS_BUCKET,
            MediaKind::Doc => DOCS_BUCKET,
        }
    }
}

impl Default for MediaKind {
    fn default() -> Self {
        MediaKind::Photo
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadUrlQuery {
    #[serde(default)]
    pub kind: MediaKind,
    pub room_id: Uuid,
    pub filename: Option<String>,
}

/// Response keys match what the web client expects.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadUrlResponse {
    pub bucket: String,
    #[serde(rename = "storagePath")]
    pub storage_path: String,
    #[serde(rename = "signedUrl")]
    pub signed_url: String,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveMediaRequest {
    pub room_id: Uuid,
    pub kind: MediaKind,
    #[validate(length(min = 3, message = "Storage path is required"))]
    pub storage_path: String,
    pub title: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MediaListQuery {
    pub room_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MediaListResponse {
    pub photos: Vec<RoomPhoto>,
    pub documents: Vec<Document>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetHeroRequest {
    pub photo_id: Uuid,
    pub room_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddTocEntryRequest {
    pub room_id: Uuid,
    #[validate(length(min = 1, message = "Line is required"))]
    pub line: String,
}

#[derive(Debug, Deserialize)]
pub struct TocListQuery {
    pub room_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct StorageRedirectQuery {
    pub bucket: String,
    pub path: String,
}
