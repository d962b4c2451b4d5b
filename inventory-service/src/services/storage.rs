//! Client for the hosted object-storage API. Objects themselves never flow
//! through this service; it only mints short-lived signed URLs.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use crate::config::StorageConfig;

pub const PHOTOS_BUCKET: &str = "photos";
pub const DOCS_BUCKET: &str = "docs";

#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    service_key: SecretString,
    signed_url_ttl_secs: u32,
}

#[derive(Serialize)]
struct SignRequest {
    #[serde(rename = "expiresIn")]
    expires_in: u32,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

#[derive(Deserialize)]
struct UploadSignResponse {
    url: String,
}

/// A one-shot upload slot: the URL to PUT to and its bearer token.
#[derive(Debug, Clone)]
pub struct SignedUpload {
    pub signed_url: String,
    pub token: String,
}

impl StorageClient {
    pub fn new(config: &StorageConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
            signed_url_ttl_secs: config.signed_url_ttl_secs,
        })
    }

    /// Short-lived download URL for one object.
    pub async fn create_signed_url(&self, bucket: &str, path: &str) -> Result<String, AppError> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.base_url, bucket, path
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.service_key.expose_secret())
            .json(&SignRequest {
                expires_in: self.signed_url_ttl_secs,
            })
            .send()
            .await
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Storage request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InternalError(anyhow::anyhow!(
                "Storage sign failed ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let data: SignResponse = response.json().await.map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Invalid storage response: {}", e))
        })?;
        Ok(format!("{}/storage/v1{}", self.base_url, data.signed_url))
    }

    /// Signed upload slot the client PUTs the object to directly.
    pub async fn create_signed_upload_url(
        &self,
        bucket: &str,
        path: &str,
    ) -> Result<SignedUpload, AppError> {
        let url = format!(
            "{}/storage/v1/object/upload/sign/{}/{}",
            self.base_url, bucket, path
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.service_key.expose_secret())
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Storage request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InternalError(anyhow::anyhow!(
                "Storage upload sign failed ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let data: UploadSignResponse = response.json().await.map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Invalid storage response: {}", e))
        })?;

        // The token rides in the returned URL's query string.
        let token = data
            .url
            .split_once("token=")
            .map(|(_, token)| token.to_string())
            .unwrap_or_default();

        Ok(SignedUpload {
            signed_url: format!("{}/storage/v1{}", self.base_url, data.url),
            token,
        })
    }
}
