//! Detection service HTTP client
//!
//! `POST {base}/upload`: multipart with a `video` file part and a `threshold`
//! text part; the file is streamed and every chunk handed to the body is reported
//! as transfer progress.
//! `GET {base}/model_metrics`: metrics only.

use crate::config::ClientConfig;
use crate::error::{MetricsFetchError, TransportError};
use crate::models::ModelMetrics;
use crate::services::transport::{
    DetectionTransport, MetricsFetcher, ProgressSender, TransferProgress, UploadRequest,
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Url};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;

const USER_AGENT: &str = concat!("railwatch/", env!("CARGO_PKG_VERSION"));
const UPLOAD_PATH: &str = "upload";
const METRICS_PATH: &str = "model_metrics";
const METRICS_TIMEOUT_SECS: u64 = 30;

/// Optional fields of a non-success response body
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// reqwest-backed detection service client
#[derive(Debug, Clone)]
pub struct DetectionClient {
    http_client: reqwest::Client,
    upload_url: Url,
    metrics_url: Url,
    upload_timeout: Duration,
}

impl DetectionClient {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let base = with_trailing_slash(&config.service_url)?;
        let upload_url = base
            .join(UPLOAD_PATH)
            .map_err(|e| TransportError::Network(format!("invalid service URL: {}", e)))?;
        let metrics_url = base
            .join(METRICS_PATH)
            .map_err(|e| TransportError::Network(format!("invalid service URL: {}", e)))?;

        Ok(Self {
            http_client,
            upload_url,
            metrics_url,
            upload_timeout: config.upload_timeout,
        })
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    pub fn metrics_url(&self) -> &Url {
        &self.metrics_url
    }

    async fn video_part(
        &self,
        path: &Path,
        file_name: &str,
        progress: ProgressSender,
    ) -> Result<Part, TransportError> {
        let file = tokio::fs::File::open(path).await?;
        let total_bytes = file.metadata().await?.len();

        let mut sent_bytes = 0u64;
        let stream = ReaderStream::new(file).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                sent_bytes += bytes.len() as u64;
                // Receiver gone means the session stopped listening; keep streaming
                let _ = progress.send(TransferProgress {
                    sent_bytes,
                    total_bytes,
                });
            }
            chunk
        });

        let part = Part::stream_with_length(Body::wrap_stream(stream), total_bytes)
            .file_name(file_name.to_string())
            .mime_str(video_mime_type(path))
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(part)
    }
}

#[async_trait]
impl DetectionTransport for DetectionClient {
    async fn upload(
        &self,
        request: UploadRequest,
        progress: ProgressSender,
    ) -> Result<String, TransportError> {
        let part = self
            .video_part(&request.video.path, &request.video.file_name, progress)
            .await?;
        let form = Form::new()
            .part("video", part)
            .text("threshold", request.threshold.to_string());

        tracing::debug!(
            url = %self.upload_url,
            file = %request.video.file_name,
            size_bytes = request.video.size_bytes,
            threshold = %request.threshold,
            "Sending upload request"
        );

        let response = self
            .http_client
            .post(self.upload_url.clone())
            .timeout(self.upload_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_request_error)?;

        if !status.is_success() {
            let error_body: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                details = ?error_body.details,
                message = ?error_body.message,
                "Detection service rejected upload"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                details: error_body.details,
                message: error_body.message,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl MetricsFetcher for DetectionClient {
    async fn fetch_metrics(&self) -> Result<ModelMetrics, MetricsFetchError> {
        let response = self
            .http_client
            .get(self.metrics_url.clone())
            .timeout(Duration::from_secs(METRICS_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| MetricsFetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetricsFetchError::Status(status.as_u16()));
        }

        response
            .json::<ModelMetrics>()
            .await
            .map_err(|e| MetricsFetchError::Parse(e.to_string()))
    }
}

fn map_request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut
    } else {
        TransportError::Network(err.to_string())
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`
fn with_trailing_slash(service_url: &str) -> Result<Url, TransportError> {
    let normalized = if service_url.ends_with('/') {
        service_url.to_string()
    } else {
        format!("{}/", service_url)
    };
    Url::parse(&normalized)
        .map_err(|e| TransportError::Network(format!("invalid service URL {}: {}", service_url, e)))
}

fn video_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Threshold;

    fn config(url: &str) -> ClientConfig {
        ClientConfig {
            service_url: url.to_string(),
            threshold: Threshold::default(),
            upload_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_endpoint_urls() {
        let client = DetectionClient::new(&config("http://localhost:8000")).unwrap();
        assert_eq!(client.upload_url().as_str(), "http://localhost:8000/upload");
        assert_eq!(client.metrics_url().as_str(), "http://localhost:8000/model_metrics");
    }

    #[test]
    fn test_base_path_kept() {
        let client = DetectionClient::new(&config("http://host/api/v1")).unwrap();
        assert_eq!(client.upload_url().as_str(), "http://host/api/v1/upload");
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(DetectionClient::new(&config("not a url")).is_err());
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(video_mime_type(Path::new("a.MP4")), "video/mp4");
        assert_eq!(video_mime_type(Path::new("a.mkv")), "video/x-matroska");
        assert_eq!(video_mime_type(Path::new("a")), "application/octet-stream");
    }
}
