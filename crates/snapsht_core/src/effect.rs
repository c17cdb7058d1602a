use crate::model::{ScreenshotOptions, ScreenshotRequest, VideoRequest};
use crate::RequestId;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubmitScreenshot {
        request_id: RequestId,
        request: ScreenshotRequest,
    },
    SubmitVideo {
        request_id: RequestId,
        request: VideoRequest,
    },
    CreateBatch {
        request_id: RequestId,
        urls: Vec<String>,
        options: Option<ScreenshotOptions>,
    },
    /// Start polling `batch_id`; status messages carry `request_id`.
    StartPolling {
        request_id: RequestId,
        batch_id: String,
    },
    CancelPolling { request_id: RequestId },
}
