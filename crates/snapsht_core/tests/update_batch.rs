use std::sync::Once;

use pretty_assertions::assert_eq;
use snapsht_core::{
    update, AppState, BatchJob, BatchState, BatchStatus, BatchTicket, Effect, JobResult, Msg,
    PanelPhase, PollPhase, ScreenshotOptions,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(snapsht_logging::initialize_for_tests);
}

fn ticket(batch_id: &str) -> BatchTicket {
    BatchTicket {
        batch_id: batch_id.to_string(),
        total_jobs: 2,
        status_url: format!("/api/batch/{batch_id}"),
    }
}

fn status(batch_id: &str, state: BatchState, completed: u32, pending: u32) -> BatchStatus {
    let total = completed + pending;
    BatchStatus {
        batch_id: batch_id.to_string(),
        total_jobs: total,
        completed,
        failed: 0,
        processing: 0,
        pending,
        status: state,
        progress: if total == 0 {
            0.0
        } else {
            f64::from(completed) / f64::from(total) * 100.0
        },
        jobs: Vec::new(),
    }
}

fn start_batch(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::BatchInputChanged(input.to_string()));
    update(state, Msg::StartBatchClicked)
}

fn create_request_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::CreateBatch { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("create batch effect")
}

/// Submits a batch and accepts its ticket, leaving the panel polling.
fn polling_batch(batch_id: &str) -> (AppState, u64) {
    let (state, effects) = start_batch(AppState::new(), "https://a.com\nhttps://b.com");
    let request_id = create_request_id(&effects);
    let (state, _) = update(
        state,
        Msg::BatchCreated {
            request_id,
            result: Ok(ticket(batch_id)),
        },
    );
    (state, request_id)
}

#[test]
fn batch_input_is_split_trimmed_and_filtered() {
    init_logging();
    let (state, effects) = start_batch(AppState::new(), "  \n https://a.com \n\nhttps://b.com  ");

    assert_eq!(
        effects,
        vec![Effect::CreateBatch {
            request_id: 1,
            urls: vec!["https://a.com".to_string(), "https://b.com".to_string()],
            options: Some(ScreenshotOptions {
                full_page: Some(true),
                ..ScreenshotOptions::default()
            }),
        }]
    );
    let view = state.view();
    assert_eq!(view.batch.phase, PanelPhase::InFlight);
    assert_eq!(view.batch.poll, PollPhase::Idle);
    assert_eq!(view.batch.submit_label, "Processing...");
}

#[test]
fn blank_batch_input_is_rejected() {
    init_logging();
    let (mut state, effects) = start_batch(AppState::new(), "   \n\n \t \n");

    assert!(effects.is_empty());
    assert!(!state.view().batch.submit_enabled);
    assert_eq!(state.view().batch.phase, PanelPhase::Empty);
    assert!(state.consume_dirty());
}

#[test]
fn full_page_toggle_flows_into_options() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::BatchFullPageChanged(false));
    let (_, effects) = start_batch(state, "https://a.com");

    let Some(Effect::CreateBatch { options, .. }) = effects.first() else {
        panic!("expected create batch, got {effects:?}");
    };
    assert_eq!(options.as_ref().and_then(|o| o.full_page), Some(false));
}

#[test]
fn accepted_ticket_starts_polling() {
    init_logging();
    let (state, effects) = start_batch(AppState::new(), "https://a.com");
    let request_id = create_request_id(&effects);

    let (state, effects) = update(
        state,
        Msg::BatchCreated {
            request_id,
            result: Ok(ticket("b-1")),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            request_id,
            batch_id: "b-1".to_string(),
        }]
    );
    let view = state.view();
    assert_eq!(view.batch.poll, PollPhase::AwaitingFirstResponse);
    assert_eq!(view.batch.batch_id.as_deref(), Some("b-1"));
}

#[test]
fn failed_creation_surfaces_message() {
    init_logging();
    let (state, effects) = start_batch(AppState::new(), "https://a.com");
    let request_id = create_request_id(&effects);

    let (state, effects) = update(
        state,
        Msg::BatchCreated {
            request_id,
            result: Err("Batch creation failed".to_string()),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(
        view.batch.phase,
        PanelPhase::Failed("Batch creation failed".to_string())
    );
    assert_eq!(view.batch.poll, PollPhase::Idle);
    assert!(view.batch.submit_enabled);
}

#[test]
fn polling_runs_until_terminal_status() {
    init_logging();
    let (state, request_id) = polling_batch("b-1");

    let (state, effects) = update(
        state,
        Msg::BatchStatusPolled {
            request_id,
            result: Ok(status("b-1", BatchState::Pending, 0, 2)),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.batch.poll, PollPhase::Polling);
    assert_eq!(view.batch.phase, PanelPhase::InFlight);
    assert_eq!(view.batch.progress.as_ref().map(|p| p.pending), Some(2));

    let (state, _) = update(
        state,
        Msg::BatchStatusPolled {
            request_id,
            result: Ok(status("b-1", BatchState::Processing, 1, 1)),
        },
    );
    assert_eq!(state.view().batch.poll, PollPhase::Polling);

    let done = status("b-1", BatchState::Completed, 2, 0);
    let (state, _) = update(
        state,
        Msg::BatchStatusPolled {
            request_id,
            result: Ok(done.clone()),
        },
    );
    let view = state.view();
    assert_eq!(view.batch.poll, PollPhase::Terminal);
    assert_eq!(view.batch.phase, PanelPhase::Ready(done));
    assert_eq!(view.batch.progress.as_ref().map(|p| p.percent), Some(100.0));

    // Late statuses after the terminal one change nothing.
    let mut state = state;
    assert!(state.consume_dirty());
    let (mut state, _) = update(
        state,
        Msg::BatchStatusPolled {
            request_id,
            result: Ok(status("b-1", BatchState::Processing, 1, 1)),
        },
    );
    assert!(!state.consume_dirty());
    assert_eq!(state.view().batch.poll, PollPhase::Terminal);
}

#[test]
fn unknown_status_is_terminal() {
    init_logging();
    let (state, request_id) = polling_batch("b-1");
    let (state, _) = update(
        state,
        Msg::BatchStatusPolled {
            request_id,
            result: Ok(status("b-1", BatchState::Other("cancelled".into()), 0, 2)),
        },
    );

    assert_eq!(state.view().batch.poll, PollPhase::Terminal);
    assert!(state.view().is_settled(snapsht_core::Panel::Batch));
}

#[test]
fn poll_failure_moves_to_error() {
    init_logging();
    let (state, request_id) = polling_batch("b-1");
    let (state, _) = update(
        state,
        Msg::BatchStatusPolled {
            request_id,
            result: Ok(status("b-1", BatchState::Processing, 1, 1)),
        },
    );
    let (state, _) = update(
        state,
        Msg::BatchStatusPolled {
            request_id,
            result: Err("Batch not found".to_string()),
        },
    );

    let view = state.view();
    assert_eq!(view.batch.poll, PollPhase::Error);
    assert_eq!(
        view.batch.phase,
        PanelPhase::Failed("Batch not found".to_string())
    );
    // The last snapshot stays visible next to the error.
    assert_eq!(view.batch.progress.as_ref().map(|p| p.completed), Some(1));
}

#[test]
fn restarting_batch_cancels_running_poll() {
    init_logging();
    let (state, first) = polling_batch("b-1");
    let (state, effects) = update(state, Msg::StartBatchClicked);

    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0], Effect::CancelPolling { request_id: first });
    let second = create_request_id(&effects);
    assert_ne!(first, second);

    let view = state.view();
    assert_eq!(view.batch.phase, PanelPhase::InFlight);
    assert_eq!(view.batch.batch_id, None);
    assert_eq!(view.batch.progress, None);

    // The cancelled poll's final answer is stale.
    let (state, _) = update(
        state,
        Msg::BatchStatusPolled {
            request_id: first,
            result: Ok(status("b-1", BatchState::Completed, 2, 0)),
        },
    );
    assert_eq!(state.view().batch.phase, PanelPhase::InFlight);
}

#[test]
fn restarting_during_creation_discards_old_ticket() {
    init_logging();
    let (state, effects) = start_batch(AppState::new(), "https://a.com");
    let first = create_request_id(&effects);
    let (state, effects) = update(state, Msg::StartBatchClicked);
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::CancelPolling { .. })));

    let (_, effects) = update(
        state,
        Msg::BatchCreated {
            request_id: first,
            result: Ok(ticket("old")),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn shutdown_cancels_active_poll_once() {
    init_logging();
    let (state, request_id) = polling_batch("b-1");

    let (state, effects) = update(state, Msg::Shutdown);
    assert_eq!(effects, vec![Effect::CancelPolling { request_id }]);

    let (_, effects) = update(state, Msg::Shutdown);
    assert!(effects.is_empty());
}

#[test]
fn shutdown_without_poll_is_quiet() {
    init_logging();
    let (_, effects) = update(AppState::new(), Msg::Shutdown);
    assert!(effects.is_empty());
}

#[test]
fn exhausted_poll_gives_up() {
    init_logging();
    let (state, request_id) = polling_batch("b-1");
    let (state, _) = update(
        state,
        Msg::BatchPollExhausted {
            request_id,
            attempts: 5,
        },
    );

    let view = state.view();
    assert_eq!(view.batch.poll, PollPhase::GaveUp);
    assert_eq!(
        view.batch.phase,
        PanelPhase::Failed("Batch still running after 5 status checks".to_string())
    );
}

#[test]
fn job_rows_expose_download_paths_for_completed_jobs() {
    init_logging();
    let (state, request_id) = polling_batch("b-1");
    let mut snapshot = status("b-1", BatchState::Processing, 1, 0);
    snapshot.total_jobs = 2;
    snapshot.failed = 1;
    snapshot.jobs = vec![
        BatchJob {
            id: "j1".into(),
            url: "https://a.com".into(),
            status: BatchState::Completed,
            result: Some(JobResult {
                download_url: "/api/screenshot/j1".into(),
                ..JobResult::default()
            }),
            error: None,
        },
        BatchJob {
            id: "j2".into(),
            url: "https://b.com".into(),
            status: BatchState::Failed,
            result: None,
            error: Some("timeout".into()),
        },
    ];

    let (state, _) = update(
        state,
        Msg::BatchStatusPolled {
            request_id,
            result: Ok(snapshot),
        },
    );
    let view = state.view();
    let progress = view.batch.progress.expect("progress");
    assert_eq!(progress.jobs.len(), 2);
    assert_eq!(
        progress.jobs[0].download_path.as_deref(),
        Some("/api/screenshot/j1")
    );
    assert_eq!(progress.jobs[1].download_path, None);
    assert_eq!(progress.jobs[1].error.as_deref(), Some("timeout"));
}
