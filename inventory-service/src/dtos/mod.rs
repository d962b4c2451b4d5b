pub mod ai;
pub mod asset;
pub mod auth;
pub mod media;
pub mod report;
pub mod room;
pub mod shopping;
pub mod task;

use serde::{Deserialize, Serialize};

/// Error envelope every failing endpoint returns.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}
