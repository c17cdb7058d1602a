use std::time::Duration;

/// Address of a capture service running on the local machine.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Scheme, host and optional port of the capture service, without a path.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout; `None` waits as long as the server takes.
    pub request_timeout: Option<Duration>,
    /// Upper bound for downloaded artifacts.
    pub max_download_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Some(Duration::from_secs(120)),
            max_download_bytes: 512 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
