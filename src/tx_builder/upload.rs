//! Off-chain metadata upload
//!
//! The metadata URI is a hard prerequisite of both deploy strategies, so
//! every failure here surfaces as `DeployError::Upload`. Transport errors and
//! 5xx/429 answers are retryable; bad input and malformed answers are not.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info};

use super::errors::DeployError;
use crate::types::{MetadataDocument, TokenCreationRequest};

/// Permanent-storage gateway used when the endpoint answers with a bare id
pub const ARWEAVE_GATEWAY: &str = "https://arweave.net";

#[async_trait]
pub trait MetadataUploader: Send + Sync {
    /// Store `doc` and return its public URI
    async fn upload_json(&self, doc: &MetadataDocument) -> Result<String, DeployError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl UploadResponse {
    fn into_uri(self) -> Option<String> {
        self.uri
            .filter(|uri| !uri.is_empty())
            .or_else(|| {
                self.id
                    .filter(|id| !id.is_empty())
                    .map(|id| format!("{}/{}", ARWEAVE_GATEWAY, id))
            })
    }
}

/// POSTs the metadata document as JSON to a storage upload endpoint
#[derive(Debug, Clone)]
pub struct HttpMetadataUploader {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpMetadataUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), endpoint)
    }

    pub fn with_http(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl MetadataUploader for HttpMetadataUploader {
    async fn upload_json(&self, doc: &MetadataDocument) -> Result<String, DeployError> {
        debug!(endpoint = %self.endpoint, name = %doc.name, "Uploading metadata document");

        let response = self
            .http
            .post(&self.endpoint)
            .json(doc)
            .send()
            .await
            .map_err(|e| DeployError::upload_transient(format!("metadata upload request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeployError::upload_status("metadata upload", status.as_u16()));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| DeployError::upload_rejected(format!("metadata upload response undecodable: {}", e)))?;

        let uri = body
            .into_uri()
            .ok_or_else(|| DeployError::upload_rejected("metadata upload returned no uri"))?;
        info!(uri = %uri, "Metadata uploaded");
        Ok(uri)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinResponse {
    #[serde(default)]
    metadata_uri: Option<String>,
}

/// Multipart image + metadata pinning used by the launch platform
#[derive(Debug, Clone)]
pub struct PumpIpfsUploader {
    http: reqwest::Client,
    endpoint: String,
}

impl PumpIpfsUploader {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    async fn download_image(&self, url: &str) -> Result<(Vec<u8>, Option<String>), DeployError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| DeployError::upload_transient(format!("image download failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeployError::upload_status("image download", status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DeployError::upload_transient(format!("image download failed: {}", e)))?;
        Ok((bytes.to_vec(), content_type))
    }

    /// Download the request's image and pin it with the token fields
    pub async fn upload_with_image(&self, request: &TokenCreationRequest) -> Result<String, DeployError> {
        let image_url = request
            .image_url
            .as_deref()
            .ok_or_else(|| DeployError::upload_rejected("image url required for pinning"))?;

        let (image, content_type) = self.download_image(image_url).await?;
        debug!(bytes = image.len(), "Downloaded token image");

        let mut file = Part::bytes(image).file_name("image");
        if let Some(mime) = content_type {
            file = file
                .mime_str(&mime)
                .map_err(|e| DeployError::upload_rejected(format!("bad image content type: {}", e)))?;
        }

        let mut form = Form::new()
            .part("file", file)
            .text("name", request.name.clone())
            .text("symbol", request.symbol.clone())
            .text("description", request.description.clone());
        for (field, value) in [
            ("twitter", &request.twitter_url),
            ("telegram", &request.telegram_url),
            ("website", &request.website_url),
        ] {
            if let Some(value) = value {
                form = form.text(field, value.clone());
            }
        }
        let form = form.text("showName", "true");

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DeployError::upload_transient(format!("pinning request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeployError::upload_status("pinning", status.as_u16()));
        }

        let body: PinResponse = response
            .json()
            .await
            .map_err(|e| DeployError::upload_rejected(format!("pinning response undecodable: {}", e)))?;

        let uri = body
            .metadata_uri
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| DeployError::upload_rejected("pinning returned no metadataUri"))?;
        info!(uri = %uri, "Image and metadata pinned");
        Ok(uri)
    }
}
