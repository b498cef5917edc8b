//! HTTP implementation of `RemoteStore`.
//!
//! Talks JSON to the cluster's API server with a shared `reqwest::Client`.
//! File names are percent-encoded into the path here, so callers always pass
//! the raw name.

use super::protocol::*;
use super::store::RemoteStore;
use super::types::{FileContent, FileName, StoreError, StoreResult};
use crate::metadata::types::FileMetadataSnapshot;
use crate::status::types::SystemStatus;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

pub struct HttpStoreClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpStoreClient {
    /// `base_url` is the API server root, e.g. `http://localhost:8000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn file_url(&self, name: &FileName, suffix: &str) -> String {
        format!(
            "{}{}/{}{}",
            self.base_url,
            ENDPOINT_FILES,
            urlencoding::encode(name.as_str()),
            suffix
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> StoreResult<reqwest::Response> {
        request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))
    }

    /// Passes 2xx responses through and turns everything else into a `StoreError`.
    async fn expect_success(
        response: reqwest::Response,
        subject: &str,
    ) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = classify_failure(status.as_u16(), &body, subject);
        tracing::debug!("Request for {} failed: {}", subject, error);
        Err(error)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn send_content(
        &self,
        request: reqwest::RequestBuilder,
        content: &str,
        subject: &str,
    ) -> StoreResult<()> {
        let body = ContentRequest {
            content: content.to_string(),
        };
        let response = self.send(request.json(&body)).await?;
        Self::expect_success(response, subject).await?;
        Ok(())
    }
}

/// Maps a non-2xx response onto the error taxonomy.
///
/// `subject` names what was requested and is used when the body carries no message.
pub(crate) fn classify_failure(status: u16, body: &str, subject: &str) -> StoreError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|payload| payload.error);

    match (status, message) {
        (404, message) => StoreError::NotFound(message.unwrap_or_else(|| subject.to_string())),
        (409, message) => StoreError::Conflict(message.unwrap_or_else(|| subject.to_string())),
        (status, Some(message)) => StoreError::Rejected { status, message },
        (status, None) => StoreError::Server { status },
    }
}

/// The API server reports a duplicate name on create as a generic failure with
/// an error payload; only a 400 is a genuine validation failure.
fn create_failure(error: StoreError) -> StoreError {
    match error {
        StoreError::Rejected { status, message } if status != 400 => StoreError::Conflict(message),
        other => other,
    }
}

#[async_trait]
impl RemoteStore for HttpStoreClient {
    async fn list_files(&self) -> StoreResult<Vec<FileName>> {
        let url = format!("{}{}", self.base_url, ENDPOINT_FILES);
        let response = self.send(self.http_client.get(url)).await?;
        let response = Self::expect_success(response, "file list").await?;
        let listing: FileListResponse = Self::decode(response).await?;

        tracing::debug!("Listed {} files", listing.files.len());
        Ok(listing.files.into_iter().map(FileName).collect())
    }

    async fn read_file(&self, name: &FileName) -> StoreResult<FileContent> {
        let url = self.file_url(name, "");
        let response = self.send(self.http_client.get(url)).await?;
        let response = Self::expect_success(response, name.as_str()).await?;
        let body: ContentResponse = Self::decode(response).await?;

        if body.warning {
            tracing::warn!("Read of {} was only partially assembled", name);
        }

        Ok(FileContent {
            text: body.content,
            partial: body.warning,
        })
    }

    async fn create_file(&self, name: &FileName, content: &str) -> StoreResult<()> {
        let request = self.http_client.post(self.file_url(name, ""));
        self.send_content(request, content, name.as_str())
            .await
            .map_err(create_failure)
    }

    async fn write_file(&self, name: &FileName, content: &str) -> StoreResult<()> {
        let request = self.http_client.put(self.file_url(name, ""));
        self.send_content(request, content, name.as_str()).await
    }

    async fn append_file(&self, name: &FileName, text: &str) -> StoreResult<()> {
        let request = self.http_client.post(self.file_url(name, SUFFIX_APPEND));
        self.send_content(request, text, name.as_str()).await
    }

    async fn delete_file(&self, name: &FileName) -> StoreResult<()> {
        let response = self
            .send(self.http_client.delete(self.file_url(name, "")))
            .await?;
        Self::expect_success(response, name.as_str()).await?;
        Ok(())
    }

    async fn file_metadata(&self, name: &FileName) -> StoreResult<FileMetadataSnapshot> {
        let url = self.file_url(name, SUFFIX_METADATA);
        let response = self.send(self.http_client.get(url)).await?;
        let response = Self::expect_success(response, name.as_str()).await?;
        let body: MetadataResponse = Self::decode(response).await?;

        Ok(FileMetadataSnapshot::from_response(name.clone(), body))
    }

    async fn system_status(&self) -> StoreResult<SystemStatus> {
        let url = format!("{}{}", self.base_url, ENDPOINT_SYSTEM_STATUS);
        let response = self.send(self.http_client.get(url)).await?;

        // The feed answers 503 with a `degraded` status body when the master
        // is unreachable.
        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<StatusResponse>(&body) {
                Ok(degraded) if !degraded.status.is_empty() => {
                    tracing::debug!("Status feed reports {}", degraded.status);
                    let mut status = SystemStatus::from_response(degraded);
                    status.master_available = false;
                    Ok(status)
                }
                _ => Err(classify_failure(503, &body, "system status")),
            };
        }

        let response = Self::expect_success(response, "system status").await?;
        let body: StatusResponse = Self::decode(response).await?;

        Ok(SystemStatus::from_response(body))
    }

    async fn health(&self) -> StoreResult<bool> {
        let url = format!("{}{}", self.base_url, ENDPOINT_HEALTH);
        let response = self.send(self.http_client.get(url)).await?;

        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(false);
        }

        let response = Self::expect_success(response, "health").await?;
        let body: HealthResponse = Self::decode(response).await?;
        Ok(body.master_available)
    }
}
