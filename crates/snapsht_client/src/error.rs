use std::fmt;

use thiserror::Error;

/// The remote operation a failure belongs to; picks the fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Screenshot,
    Video,
    CreateBatch,
    BatchStatus,
    Health,
    Readiness,
    Download,
    Delete,
}

impl Operation {
    /// Message surfaced when the server gives no usable `detail`.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Screenshot => "Screenshot failed",
            Operation::Video => "Video capture failed",
            Operation::CreateBatch => "Batch creation failed",
            Operation::BatchStatus => "Failed to get batch status",
            Operation::Health => "Health check failed",
            Operation::Readiness => "Readiness check failed",
            Operation::Download => "Download failed",
            Operation::Delete => "Delete failed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Screenshot => "screenshot",
            Operation::Video => "video",
            Operation::CreateBatch => "create-batch",
            Operation::BatchStatus => "batch-status",
            Operation::Health => "health",
            Operation::Readiness => "readiness",
            Operation::Download => "download",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidBaseUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidBaseUrl => write!(f, "invalid base url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}

/// A failed remote call. `message` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn fallback(kind: FailureKind, operation: Operation) -> Self {
        Self::new(kind, operation.fallback_message())
    }
}
