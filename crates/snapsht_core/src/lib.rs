//! Snapsht core: data model, request forms and the pure panel state machine.
mod effect;
mod forms;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use forms::{parse_urls, BatchForm, ScreenshotForm, VideoForm};
pub use model::{
    BatchJob, BatchState, BatchStatus, BatchTicket, CaptureKind, CaptureResult, Dimensions,
    HealthReport, ImageFormat, JobResult, JobState, Readiness, ScreenshotOptions,
    ScreenshotRequest, ScreenshotResult, ScrollSpeed, VideoFormat, VideoRequest, VideoResult,
};
pub use msg::Msg;
pub use state::{AppState, Panel, PanelPhase, PollPhase, RequestId};
pub use update::update;
pub use view_model::{AppViewModel, BatchPanelView, BatchProgressView, CapturePanelView, JobRowView};
