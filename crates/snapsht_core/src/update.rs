use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TabSelected(panel) => {
            state.select_panel(panel);
            Vec::new()
        }
        Msg::ScreenshotFormChanged(form) => {
            state.set_screenshot_form(form);
            Vec::new()
        }
        Msg::VideoFormChanged(form) => {
            state.set_video_form(form);
            Vec::new()
        }
        Msg::BatchInputChanged(text) => {
            state.set_batch_text(text);
            Vec::new()
        }
        Msg::BatchFullPageChanged(full_page) => {
            state.set_batch_full_page(full_page);
            Vec::new()
        }
        Msg::CaptureScreenshotClicked => match state.begin_screenshot() {
            Some((request_id, request)) => vec![Effect::SubmitScreenshot {
                request_id,
                request,
            }],
            None => Vec::new(),
        },
        Msg::CaptureVideoClicked => match state.begin_video() {
            Some((request_id, request)) => vec![Effect::SubmitVideo {
                request_id,
                request,
            }],
            None => Vec::new(),
        },
        Msg::StartBatchClicked => {
            if !state.batch_form().can_submit() {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(2);
            if let Some(request_id) = state.detach_batch() {
                effects.push(Effect::CancelPolling { request_id });
            }
            if let Some((request_id, urls, options)) = state.begin_batch() {
                effects.push(Effect::CreateBatch {
                    request_id,
                    urls,
                    options: Some(options),
                });
            }
            effects
        }
        Msg::ScreenshotFinished { request_id, result } => {
            state.finish_screenshot(request_id, result);
            Vec::new()
        }
        Msg::VideoFinished { request_id, result } => {
            state.finish_video(request_id, result);
            Vec::new()
        }
        Msg::BatchCreated { request_id, result } => match result {
            Ok(ticket) => {
                if state.accept_batch_ticket(request_id, &ticket) {
                    vec![Effect::StartPolling {
                        request_id,
                        batch_id: ticket.batch_id,
                    }]
                } else {
                    Vec::new()
                }
            }
            Err(message) => {
                state.fail_batch_creation(request_id, message);
                Vec::new()
            }
        },
        Msg::BatchStatusPolled { request_id, result } => {
            state.apply_batch_status(request_id, result);
            Vec::new()
        }
        Msg::BatchPollExhausted {
            request_id,
            attempts,
        } => {
            state.give_up_batch(request_id, attempts);
            Vec::new()
        }
        Msg::Shutdown => match state.detach_batch() {
            Some(request_id) => vec![Effect::CancelPolling { request_id }],
            None => Vec::new(),
        },
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
