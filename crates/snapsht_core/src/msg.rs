use crate::forms::{ScreenshotForm, VideoForm};
use crate::model::{BatchStatus, BatchTicket, ScreenshotResult, VideoResult};
use crate::{Panel, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User switched to another panel.
    TabSelected(Panel),
    /// User edited the screenshot form.
    ScreenshotFormChanged(ScreenshotForm),
    /// User edited the video form.
    VideoFormChanged(VideoForm),
    /// User edited the batch url list.
    BatchInputChanged(String),
    /// User toggled full-page capture for the batch.
    BatchFullPageChanged(bool),
    /// User clicked "Capture Screenshot".
    CaptureScreenshotClicked,
    /// User clicked "Capture Video".
    CaptureVideoClicked,
    /// User clicked "Start Batch".
    StartBatchClicked,
    /// Screenshot request resolved.
    ScreenshotFinished {
        request_id: RequestId,
        result: Result<ScreenshotResult, String>,
    },
    /// Video request resolved.
    VideoFinished {
        request_id: RequestId,
        result: Result<VideoResult, String>,
    },
    /// Batch creation resolved.
    BatchCreated {
        request_id: RequestId,
        result: Result<BatchTicket, String>,
    },
    /// One status poll resolved.
    BatchStatusPolled {
        request_id: RequestId,
        result: Result<BatchStatus, String>,
    },
    /// The poller hit its attempt or time bound.
    BatchPollExhausted { request_id: RequestId, attempts: u32 },
    /// The view is being torn down.
    Shutdown,
    /// Render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
