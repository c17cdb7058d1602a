//! Wire-level data model shared by the client adapter and the view state.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    #[default]
    Mp4,
    Webm,
    Gif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
    Realistic,
}

/// Screenshot parameters without the target url; also used as batch options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenshotOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_page: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// Extra settle time in milliseconds before capturing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismiss_popups: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotRequest {
    pub url: String,
    #[serde(flatten)]
    pub options: ScreenshotOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Recording length in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<VideoFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_speed: Option<ScrollSpeed>,
    /// Fraction of the page to scroll through, 0.1 to 1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_depth: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_scroll_px: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_multiplier: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismiss_popups: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Fields common to every finished capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub id: String,
    pub filename: String,
    /// Size of the stored artifact in bytes.
    pub size: u64,
    pub format: String,
    pub dimensions: Dimensions,
    /// Server-relative path; resolve it with the client's download url helper.
    pub download_url: String,
    pub created_at: String,
}

impl CaptureResult {
    /// Parses `created_at`, accepting RFC 3339 or a naive ISO 8601 timestamp
    /// (taken as UTC).
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotResult {
    #[serde(flatten)]
    pub capture: CaptureResult,
    #[serde(default)]
    pub full_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    #[serde(flatten)]
    pub capture: CaptureResult,
    /// Recording length in milliseconds.
    pub duration: u32,
    pub fps: u32,
}

/// Acknowledgement returned when a batch is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTicket {
    pub batch_id: String,
    pub total_jobs: u32,
    pub status_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BatchState {
    Pending,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl BatchState {
    /// Anything other than pending or processing ends polling.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BatchState::Pending | BatchState::Processing)
    }

    pub fn as_str(&self) -> &str {
        match self {
            BatchState::Pending => "pending",
            BatchState::Processing => "processing",
            BatchState::Completed => "completed",
            BatchState::Failed => "failed",
            BatchState::Other(raw) => raw,
        }
    }
}

impl From<String> for BatchState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => BatchState::Pending,
            "processing" => BatchState::Processing,
            "completed" => BatchState::Completed,
            "failed" => BatchState::Failed,
            _ => BatchState::Other(raw),
        }
    }
}

impl From<BatchState> for String {
    fn from(state: BatchState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-job state uses the same vocabulary as the batch.
pub type JobState = BatchState;

/// Partial capture summary attached to a finished batch job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    pub download_url: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJob {
    pub id: String,
    pub url: String,
    pub status: JobState,
    #[serde(default)]
    pub result: Option<JobResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatus {
    pub batch_id: String,
    pub total_jobs: u32,
    pub completed: u32,
    pub failed: u32,
    pub processing: u32,
    pub pending: u32,
    pub status: BatchState,
    /// Percentage of finished jobs, 0.0 to 100.0.
    pub progress: f64,
    #[serde(default)]
    pub jobs: Vec<BatchJob>,
}

impl BatchStatus {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True when the per-state counts add up to `total_jobs`.
    pub fn counts_consistent(&self) -> bool {
        let sum = u64::from(self.completed)
            + u64::from(self.failed)
            + u64::from(self.processing)
            + u64::from(self.pending);
        sum == u64::from(self.total_jobs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: String,
    /// Seconds since the service started.
    pub uptime: f64,
    #[serde(default)]
    pub browser: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    pub ready: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    Screenshot,
    Video,
}

impl CaptureKind {
    pub fn api_segment(self) -> &'static str {
        match self {
            CaptureKind::Screenshot => "screenshot",
            CaptureKind::Video => "video",
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
