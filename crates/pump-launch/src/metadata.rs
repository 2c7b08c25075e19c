//! Off-chain metadata publishing.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client};
use serde::Deserialize;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::types::TokenMetadata;

const IMAGE_FILE_NAME: &str = "image.png";
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Publishes token metadata and returns the URI the on-chain record points at.
#[async_trait]
pub trait MetadataPublisher: Send + Sync {
    async fn publish(&self, metadata: &TokenMetadata) -> Result<String, DeployError>;
}

#[async_trait]
impl<T: MetadataPublisher + ?Sized> MetadataPublisher for Arc<T> {
    async fn publish(&self, metadata: &TokenMetadata) -> Result<String, DeployError> {
        (**self).publish(metadata).await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    metadata_uri: Option<String>,
}

struct FetchedImage {
    bytes: Vec<u8>,
    content_type: String,
}

/// Multipart upload to the pump.fun IPFS endpoint.
#[derive(Debug, Clone)]
pub struct HttpMetadataPublisher {
    client: Client,
    endpoint: String,
    max_image_bytes: usize,
}

impl HttpMetadataPublisher {
    pub fn new(config: &DeployConfig) -> Result<Self, DeployError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DeployError::MetadataUnreachable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.metadata_url.clone(),
            max_image_bytes: config.max_image_bytes,
        })
    }

    /// Best effort. Any failure leaves the token without an image.
    async fn fetch_image(&self, url: &str) -> Option<FetchedImage> {
        let mut response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%url, error = %e, "image fetch failed, continuing without image");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                %url,
                status = response.status().as_u16(),
                "image fetch rejected, continuing without image"
            );
            return None;
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_image_bytes as u64)
        {
            tracing::warn!(
                %url,
                limit = self.max_image_bytes,
                "image too large, continuing without image"
            );
            return None;
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|ct| Part::bytes(Vec::new()).mime_str(ct).is_ok())
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();

        // Chunked read: a body without a usable Content-Length stops at the cap.
        let mut bytes = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if bytes.len() + chunk.len() > self.max_image_bytes {
                        tracing::warn!(
                            %url,
                            limit = self.max_image_bytes,
                            "image too large, continuing without image"
                        );
                        return None;
                    }
                    bytes.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(
                        %url,
                        error = %e,
                        "image body unreadable, continuing without image"
                    );
                    return None;
                }
            }
        }

        Some(FetchedImage {
            bytes,
            content_type,
        })
    }

    async fn build_form(&self, metadata: &TokenMetadata) -> Form {
        let mut form = Form::new()
            .text("name", metadata.name.clone())
            .text("symbol", metadata.symbol.clone())
            .text("description", metadata.description.clone())
            .text("showName", "true");

        let socials = [
            ("twitter", &metadata.socials.twitter),
            ("telegram", &metadata.socials.telegram),
            ("website", &metadata.socials.website),
        ];
        for (field, value) in socials {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                form = form.text(field, value.to_string());
            }
        }

        if let Some(url) = metadata.image_url.as_deref().filter(|u| !u.is_empty()) {
            if let Some(part) = self.fetch_image(url).await.and_then(image_part) {
                form = form.part("file", part);
            }
        }

        form
    }
}

/// The MIME type was checked when the image was fetched.
fn image_part(image: FetchedImage) -> Option<Part> {
    Part::bytes(image.bytes)
        .file_name(IMAGE_FILE_NAME)
        .mime_str(&image.content_type)
        .ok()
}

#[async_trait]
impl MetadataPublisher for HttpMetadataPublisher {
    async fn publish(&self, metadata: &TokenMetadata) -> Result<String, DeployError> {
        let form = self.build_form(metadata).await;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DeployError::MetadataUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeployError::MetadataUploadFailed {
                status: status.as_u16(),
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| DeployError::MetadataDecode(e.to_string()))?;

        let uri = body
            .metadata_uri
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| DeployError::MetadataDecode("response has no metadataUri".into()))?;

        tracing::debug!(%uri, "upload accepted");
        Ok(uri)
    }
}
