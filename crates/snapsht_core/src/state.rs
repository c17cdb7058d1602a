use snapsht_logging::{snapsht_debug, snapsht_warn};

use crate::forms::{BatchForm, ScreenshotForm, VideoForm};
use crate::model::{
    BatchStatus, BatchTicket, ScreenshotOptions, ScreenshotRequest, ScreenshotResult, VideoRequest,
    VideoResult,
};
use crate::view_model::{AppViewModel, BatchPanelView, BatchProgressView, CapturePanelView};

/// Tags every submission so late responses can be told apart from current ones.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Screenshot,
    Video,
    Batch,
}

/// What a panel is currently showing. Exactly one of these at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelPhase<T> {
    Empty,
    InFlight,
    Ready(T),
    Failed(String),
}

impl<T> Default for PanelPhase<T> {
    fn default() -> Self {
        PanelPhase::Empty
    }
}

impl<T> PanelPhase<T> {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, PanelPhase::InFlight)
    }
}

/// Lifecycle of the status poller attached to the batch panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    #[default]
    Idle,
    AwaitingFirstResponse,
    Polling,
    Terminal,
    Error,
    /// The poll bound (attempts or deadline) ran out before a terminal status.
    GaveUp,
}

impl PollPhase {
    /// True while a poll task exists for the panel.
    pub fn is_active(self) -> bool {
        matches!(self, PollPhase::AwaitingFirstResponse | PollPhase::Polling)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CapturePanel<F, T> {
    form: F,
    phase: PanelPhase<T>,
    current: Option<RequestId>,
}

impl<F: Default, T> Default for CapturePanel<F, T> {
    fn default() -> Self {
        Self {
            form: F::default(),
            phase: PanelPhase::Empty,
            current: None,
        }
    }
}

impl<F, T> CapturePanel<F, T> {
    fn begin(&mut self, request_id: RequestId) {
        self.phase = PanelPhase::InFlight;
        self.current = Some(request_id);
    }

    fn finish(&mut self, request_id: RequestId, result: Result<T, String>) -> bool {
        if self.current != Some(request_id) {
            snapsht_debug!("Ignoring stale capture response request_id={}", request_id);
            return false;
        }
        self.current = None;
        self.phase = match result {
            Ok(value) => PanelPhase::Ready(value),
            Err(message) => PanelPhase::Failed(message),
        };
        true
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct BatchPanel {
    form: BatchForm,
    phase: PanelPhase<BatchStatus>,
    poll: PollPhase,
    current: Option<RequestId>,
    batch_id: Option<String>,
    latest: Option<BatchStatus>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    active: Panel,
    screenshot: CapturePanel<ScreenshotForm, ScreenshotResult>,
    video: CapturePanel<VideoForm, VideoResult>,
    batch: BatchPanel,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let batch_progress = match &self.batch.phase {
            PanelPhase::Ready(status) => Some(status),
            _ => self.batch.latest.as_ref(),
        };
        AppViewModel {
            active: self.active,
            screenshot: CapturePanelView {
                phase: self.screenshot.phase.clone(),
                submit_enabled: !self.screenshot.phase.is_in_flight()
                    && self.screenshot.form.can_submit(),
                submit_label: if self.screenshot.phase.is_in_flight() {
                    "Capturing..."
                } else {
                    "Capture Screenshot"
                },
            },
            video: CapturePanelView {
                phase: self.video.phase.clone(),
                submit_enabled: !self.video.phase.is_in_flight() && self.video.form.can_submit(),
                submit_label: if self.video.phase.is_in_flight() {
                    "Capturing..."
                } else {
                    "Capture Video"
                },
            },
            batch: BatchPanelView {
                phase: self.batch.phase.clone(),
                poll: self.batch.poll,
                batch_id: self.batch.batch_id.clone(),
                progress: batch_progress.map(BatchProgressView::from_status),
                submit_enabled: !self.batch.phase.is_in_flight() && self.batch.form.can_submit(),
                submit_label: if self.batch.phase.is_in_flight() {
                    "Processing..."
                } else {
                    "Start Batch"
                },
            },
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn active_panel(&self) -> Panel {
        self.active
    }

    pub fn screenshot_form(&self) -> &ScreenshotForm {
        &self.screenshot.form
    }

    pub fn video_form(&self) -> &VideoForm {
        &self.video.form
    }

    pub fn batch_form(&self) -> &BatchForm {
        &self.batch.form
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn allocate_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    pub(crate) fn select_panel(&mut self, panel: Panel) {
        if self.active != panel {
            self.active = panel;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_screenshot_form(&mut self, form: ScreenshotForm) {
        self.screenshot.form = form;
        self.mark_dirty();
    }

    pub(crate) fn set_video_form(&mut self, form: VideoForm) {
        self.video.form = form;
        self.mark_dirty();
    }

    pub(crate) fn set_batch_text(&mut self, text: String) {
        self.batch.form.urls_text = text;
        self.mark_dirty();
    }

    pub(crate) fn set_batch_full_page(&mut self, full_page: bool) {
        self.batch.form.full_page = full_page;
        self.mark_dirty();
    }

    pub(crate) fn begin_screenshot(&mut self) -> Option<(RequestId, ScreenshotRequest)> {
        if !self.screenshot.form.can_submit() {
            return None;
        }
        let request_id = self.allocate_request_id();
        self.screenshot.begin(request_id);
        self.mark_dirty();
        Some((request_id, self.screenshot.form.to_request()))
    }

    pub(crate) fn finish_screenshot(
        &mut self,
        request_id: RequestId,
        result: Result<ScreenshotResult, String>,
    ) {
        if self.screenshot.finish(request_id, result) {
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_video(&mut self) -> Option<(RequestId, VideoRequest)> {
        if !self.video.form.can_submit() {
            return None;
        }
        let request_id = self.allocate_request_id();
        self.video.begin(request_id);
        self.mark_dirty();
        Some((request_id, self.video.form.to_request()))
    }

    pub(crate) fn finish_video(&mut self, request_id: RequestId, result: Result<VideoResult, String>) {
        if self.video.finish(request_id, result) {
            self.mark_dirty();
        }
    }

    /// Detaches the batch panel from its current submission.
    ///
    /// Returns the request id when a poll task is running for it, so the
    /// caller can cancel that task.
    pub(crate) fn detach_batch(&mut self) -> Option<RequestId> {
        let current = self.batch.current.take();
        let running = self.batch.poll.is_active();
        if running {
            self.batch.poll = PollPhase::Idle;
            self.mark_dirty();
        }
        current.filter(|_| running)
    }

    pub(crate) fn begin_batch(&mut self) -> Option<(RequestId, Vec<String>, ScreenshotOptions)> {
        let urls = self.batch.form.urls();
        if urls.is_empty() {
            return None;
        }
        let request_id = self.allocate_request_id();
        self.batch.current = Some(request_id);
        self.batch.phase = PanelPhase::InFlight;
        self.batch.poll = PollPhase::Idle;
        self.batch.batch_id = None;
        self.batch.latest = None;
        self.mark_dirty();
        Some((request_id, urls, self.batch.form.to_options()))
    }

    /// Records an accepted batch. Returns false when the ticket is stale.
    pub(crate) fn accept_batch_ticket(&mut self, request_id: RequestId, ticket: &BatchTicket) -> bool {
        if self.batch.current != Some(request_id) {
            snapsht_debug!(
                "Ignoring stale batch ticket request_id={} batch_id={}",
                request_id,
                ticket.batch_id
            );
            return false;
        }
        self.batch.batch_id = Some(ticket.batch_id.clone());
        self.batch.poll = PollPhase::AwaitingFirstResponse;
        self.mark_dirty();
        true
    }

    pub(crate) fn fail_batch_creation(&mut self, request_id: RequestId, message: String) {
        if self.batch.current != Some(request_id) {
            return;
        }
        self.batch.current = None;
        self.batch.phase = PanelPhase::Failed(message);
        self.batch.poll = PollPhase::Idle;
        self.mark_dirty();
    }

    pub(crate) fn apply_batch_status(
        &mut self,
        request_id: RequestId,
        result: Result<BatchStatus, String>,
    ) {
        if self.batch.current != Some(request_id) || !self.batch.poll.is_active() {
            snapsht_debug!("Ignoring stale batch status request_id={}", request_id);
            return;
        }
        match result {
            Ok(status) => {
                if !status.counts_consistent() {
                    snapsht_warn!(
                        "Batch {} counts do not add up to total_jobs={}",
                        status.batch_id,
                        status.total_jobs
                    );
                }
                if let Some(previous) = &self.batch.latest {
                    if status.progress < previous.progress {
                        snapsht_warn!(
                            "Batch {} progress went backwards ({} -> {})",
                            status.batch_id,
                            previous.progress,
                            status.progress
                        );
                    }
                }
                if status.is_terminal() {
                    self.batch.current = None;
                    self.batch.poll = PollPhase::Terminal;
                    self.batch.latest = Some(status.clone());
                    self.batch.phase = PanelPhase::Ready(status);
                } else {
                    self.batch.poll = PollPhase::Polling;
                    self.batch.latest = Some(status);
                }
            }
            Err(message) => {
                self.batch.current = None;
                self.batch.poll = PollPhase::Error;
                self.batch.phase = PanelPhase::Failed(message);
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn give_up_batch(&mut self, request_id: RequestId, attempts: u32) {
        if self.batch.current != Some(request_id) {
            return;
        }
        self.batch.current = None;
        self.batch.poll = PollPhase::GaveUp;
        self.batch.phase = PanelPhase::Failed(format!(
            "Batch still running after {attempts} status checks"
        ));
        self.mark_dirty();
    }
}
