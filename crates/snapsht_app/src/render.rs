use snapsht_core::{
    AppViewModel, BatchPanelView, BatchProgressView, BatchStatus, CapturePanelView, CaptureResult,
    JobState, Panel, PanelPhase, PollPhase, ScreenshotResult, VideoResult,
};

const BAR_WIDTH: usize = 30;

/// Renders the active panel as terminal lines. `resolve` turns a
/// server-relative download path into a full url.
pub fn render(view: &AppViewModel, resolve: &dyn Fn(&str) -> String) -> Vec<String> {
    match view.active {
        Panel::Screenshot => render_screenshot(&view.screenshot, resolve),
        Panel::Video => render_video(&view.video, resolve),
        Panel::Batch => render_batch(&view.batch, resolve),
    }
}

fn render_screenshot(
    panel: &CapturePanelView<ScreenshotResult>,
    resolve: &dyn Fn(&str) -> String,
) -> Vec<String> {
    match &panel.phase {
        PanelPhase::Empty => vec!["Screenshot preview will appear here".to_string()],
        PanelPhase::InFlight => vec![panel.submit_label.to_string()],
        PanelPhase::Failed(message) => vec![format!("Error: {message}")],
        PanelPhase::Ready(result) => {
            let mut lines = capture_lines(&result.capture, resolve);
            if result.full_page {
                lines.insert(1, "Full page: yes".to_string());
            }
            lines
        }
    }
}

fn render_video(
    panel: &CapturePanelView<VideoResult>,
    resolve: &dyn Fn(&str) -> String,
) -> Vec<String> {
    match &panel.phase {
        PanelPhase::Empty => vec!["Video preview will appear here".to_string()],
        PanelPhase::InFlight => vec![panel.submit_label.to_string()],
        PanelPhase::Failed(message) => vec![format!("Error: {message}")],
        PanelPhase::Ready(result) => {
            let mut lines = capture_lines(&result.capture, resolve);
            lines.insert(
                1,
                format!(
                    "Duration: {:.1}s at {} fps",
                    f64::from(result.duration) / 1000.0,
                    result.fps
                ),
            );
            lines
        }
    }
}

fn capture_lines(capture: &CaptureResult, resolve: &dyn Fn(&str) -> String) -> Vec<String> {
    let created = capture
        .created_at_utc()
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| capture.created_at.clone());
    vec![
        format!(
            "Dimensions: {} x {}",
            capture.dimensions.width, capture.dimensions.height
        ),
        format!("Size: {}", format_size(capture.size)),
        format!("Format: {}", capture.format.to_uppercase()),
        format!("Created: {created}"),
        format!("Download: {}", resolve(&capture.download_url)),
    ]
}

fn render_batch(panel: &BatchPanelView, resolve: &dyn Fn(&str) -> String) -> Vec<String> {
    let mut lines = Vec::new();

    match (&panel.phase, panel.poll) {
        (PanelPhase::Empty, _) => {
            lines.push("Enter URLs and start a batch".to_string());
            return lines;
        }
        (PanelPhase::InFlight, PollPhase::Idle) => lines.push("Submitting batch...".to_string()),
        (PanelPhase::InFlight, _) => lines.push(panel.submit_label.to_string()),
        (PanelPhase::Failed(message), _) => lines.push(format!("Error: {message}")),
        (PanelPhase::Ready(_), _) => {}
    }

    if let Some(batch_id) = &panel.batch_id {
        lines.push(format!("Batch: {batch_id}"));
    }
    if let Some(progress) = &panel.progress {
        lines.extend(progress_lines(progress, resolve));
    }
    lines
}

/// Renders a single status snapshot outside of the dashboard.
pub fn render_status(status: &BatchStatus, resolve: &dyn Fn(&str) -> String) -> Vec<String> {
    let mut lines = vec![format!("Batch: {}", status.batch_id)];
    lines.extend(progress_lines(&BatchProgressView::from_status(status), resolve));
    lines
}

fn progress_lines(progress: &BatchProgressView, resolve: &dyn Fn(&str) -> String) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Status: {}  {} {:.1}%",
            progress.state.as_str().to_uppercase(),
            progress_bar(progress.percent),
            progress.percent
        ),
        format!(
            "Completed {} | Processing {} | Pending {} | Failed {} | Total {}",
            progress.completed, progress.processing, progress.pending, progress.failed, progress.total
        ),
    ];

    for job in &progress.jobs {
        let line = match (&job.state, &job.download_path, &job.error) {
            (JobState::Completed, Some(path), _) => {
                format!("  [done]    {} -> {}", job.url, resolve(path))
            }
            (JobState::Failed, _, Some(error)) => format!("  [failed]  {}: {}", job.url, error),
            (state, _, _) => format!("  [{}] {}", state.as_str(), job.url),
        };
        lines.push(line);
    }
    lines
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Formats a byte count the way the service's dashboard shows it.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let value = bytes as f64;
    if value >= MB {
        format!("{:.2} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{bytes} B")
    }
}
