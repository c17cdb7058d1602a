use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use snapsht_core::{
    BatchStatus, BatchTicket, CaptureKind, HealthReport, Readiness, ScreenshotOptions,
    ScreenshotRequest, ScreenshotResult, VideoRequest, VideoResult,
};
use snapsht_logging::{snapsht_debug, snapsht_warn};

use crate::{ClientError, ClientSettings, FailureKind, Operation};

/// The four remote operations the panels depend on.
#[async_trait::async_trait]
pub trait CaptureApi: Send + Sync {
    async fn capture_screenshot(
        &self,
        request: &ScreenshotRequest,
    ) -> Result<ScreenshotResult, ClientError>;

    async fn capture_video(&self, request: &VideoRequest) -> Result<VideoResult, ClientError>;

    async fn create_batch(
        &self,
        urls: &[String],
        options: Option<&ScreenshotOptions>,
    ) -> Result<BatchTicket, ClientError>;

    async fn batch_status(&self, batch_id: &str) -> Result<BatchStatus, ClientError>;
}

#[derive(Serialize)]
struct CreateBatchBody<'a> {
    urls: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a ScreenshotOptions>,
}

#[derive(Deserialize)]
struct BatchEnvelope {
    batch: BatchStatus,
}

#[derive(Debug, Clone)]
pub struct ReqwestCaptureClient {
    base_url: String,
    client: reqwest::Client,
    max_download_bytes: u64,
}

impl ReqwestCaptureClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(&settings.base_url)?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url,
            client,
            max_download_bytes: settings.max_download_bytes,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a server-relative path (e.g. a result's `download_url`) to an
    /// absolute address by prefixing the base url.
    pub fn download_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthReport, ClientError> {
        let request = self.client.get(self.download_url("/health"));
        self.read_json(Operation::Health, request).await
    }

    pub async fn readiness(&self) -> Result<Readiness, ClientError> {
        let request = self.client.get(self.download_url("/health/ready"));
        self.read_json(Operation::Readiness, request).await
    }

    /// Fetches an artifact by its server-relative path.
    pub async fn download(&self, path: &str) -> Result<Bytes, ClientError> {
        let operation = Operation::Download;
        let max_bytes = self.max_download_bytes;
        let response = self
            .execute(operation, self.client.get(self.download_url(path)))
            .await?;

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ClientError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "Download too large",
                ));
            }
        }

        let mut bytes = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| map_reqwest_error(operation, err))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ClientError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "Download too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        snapsht_debug!("Downloaded {} bytes from {}", bytes.len(), path);
        Ok(bytes.freeze())
    }

    /// Removes a stored capture on the server.
    pub async fn delete_capture(&self, kind: CaptureKind, id: &str) -> Result<(), ClientError> {
        let url = self.download_url(&format!("/api/{}/{}", kind.api_segment(), id));
        self.execute(Operation::Delete, self.client.delete(url))
            .await
            .map(|_| ())
    }

    async fn execute(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|err| map_reqwest_error(operation, err))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(operation, &body);
        snapsht_warn!("{} returned {}: {}", operation, status, message);
        Err(ClientError::new(
            FailureKind::HttpStatus(status.as_u16()),
            message,
        ))
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.execute(operation, request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|err| map_reqwest_error(operation, err))?;
        serde_json::from_slice(&body).map_err(|err| {
            snapsht_warn!("{} response could not be decoded: {}", operation, err);
            ClientError::fallback(FailureKind::Decode, operation)
        })
    }
}

#[async_trait::async_trait]
impl CaptureApi for ReqwestCaptureClient {
    async fn capture_screenshot(
        &self,
        request: &ScreenshotRequest,
    ) -> Result<ScreenshotResult, ClientError> {
        let builder = self
            .client
            .post(self.download_url("/api/screenshot"))
            .json(request);
        self.read_json(Operation::Screenshot, builder).await
    }

    async fn capture_video(&self, request: &VideoRequest) -> Result<VideoResult, ClientError> {
        let builder = self.client.post(self.download_url("/api/video")).json(request);
        self.read_json(Operation::Video, builder).await
    }

    async fn create_batch(
        &self,
        urls: &[String],
        options: Option<&ScreenshotOptions>,
    ) -> Result<BatchTicket, ClientError> {
        let body = CreateBatchBody { urls, options };
        let builder = self.client.post(self.download_url("/api/batch")).json(&body);
        self.read_json(Operation::CreateBatch, builder).await
    }

    async fn batch_status(&self, batch_id: &str) -> Result<BatchStatus, ClientError> {
        let builder = self
            .client
            .get(self.download_url(&format!("/api/batch/{batch_id}")));
        let envelope: BatchEnvelope = self.read_json(Operation::BatchStatus, builder).await?;
        Ok(envelope.batch)
    }
}

/// Picks the server's `detail` string out of an error body, or the
/// operation's generic message when there is none.
pub(crate) fn error_message(operation: Operation, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned)
        })
        .filter(|detail| !detail.is_empty())
        .unwrap_or_else(|| operation.fallback_message().to_string())
}

fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|err| ClientError::new(FailureKind::InvalidBaseUrl, err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ClientError::new(
            FailureKind::InvalidBaseUrl,
            format!("unsupported base url: {trimmed}"),
        ));
    }
    Ok(trimmed.to_string())
}

fn map_reqwest_error(operation: Operation, err: reqwest::Error) -> ClientError {
    snapsht_warn!("{} transport error: {}", operation, err);
    if err.is_timeout() {
        return ClientError::fallback(FailureKind::Timeout, operation);
    }
    ClientError::fallback(FailureKind::Network, operation)
}
