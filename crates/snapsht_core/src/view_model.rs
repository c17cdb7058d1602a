use crate::model::{BatchState, BatchStatus, JobState, ScreenshotResult, VideoResult};
use crate::{Panel, PanelPhase, PollPhase};

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub active: Panel,
    pub screenshot: CapturePanelView<ScreenshotResult>,
    pub video: CapturePanelView<VideoResult>,
    pub batch: BatchPanelView,
    pub dirty: bool,
}

impl AppViewModel {
    /// True once the panel has nothing in flight.
    pub fn is_settled(&self, panel: Panel) -> bool {
        match panel {
            Panel::Screenshot => !self.screenshot.phase.is_in_flight(),
            Panel::Video => !self.video.phase.is_in_flight(),
            Panel::Batch => !self.batch.phase.is_in_flight(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapturePanelView<T> {
    pub phase: PanelPhase<T>,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchPanelView {
    pub phase: PanelPhase<BatchStatus>,
    pub poll: PollPhase,
    pub batch_id: Option<String>,
    /// Latest snapshot; also shown while the batch is still in flight.
    pub progress: Option<BatchProgressView>,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgressView {
    pub state: BatchState,
    pub percent: f64,
    pub total: u32,
    pub completed: u32,
    pub processing: u32,
    pub pending: u32,
    pub failed: u32,
    pub jobs: Vec<JobRowView>,
}

impl BatchProgressView {
    pub fn from_status(status: &BatchStatus) -> Self {
        Self {
            state: status.status.clone(),
            percent: status.progress.clamp(0.0, 100.0),
            total: status.total_jobs,
            completed: status.completed,
            processing: status.processing,
            pending: status.pending,
            failed: status.failed,
            jobs: status
                .jobs
                .iter()
                .map(|job| JobRowView {
                    job_id: job.id.clone(),
                    url: job.url.clone(),
                    state: job.status.clone(),
                    download_path: match (&job.status, &job.result) {
                        (JobState::Completed, Some(result)) => Some(result.download_url.clone()),
                        _ => None,
                    },
                    error: job.error.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: String,
    pub url: String,
    pub state: JobState,
    /// Server-relative path, present only for completed jobs with a result.
    pub download_path: Option<String>,
    pub error: Option<String>,
}
