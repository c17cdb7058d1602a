use std::time::Duration;

use snapsht_client::{ClientError, ClientEvent, ClientHandle};
use snapsht_core::{Effect, Msg};
use snapsht_logging::{snapsht_info, snapsht_warn};

/// Hands core effects to the client runtime and turns its events back into
/// messages for the state machine.
pub struct EffectRunner {
    client: ClientHandle,
}

impl EffectRunner {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitScreenshot {
                    request_id,
                    request,
                } => {
                    snapsht_info!("SubmitScreenshot request_id={} url={}", request_id, request.url);
                    self.client.submit_screenshot(request_id, request);
                }
                Effect::SubmitVideo {
                    request_id,
                    request,
                } => {
                    snapsht_info!("SubmitVideo request_id={} url={}", request_id, request.url);
                    self.client.submit_video(request_id, request);
                }
                Effect::CreateBatch {
                    request_id,
                    urls,
                    options,
                } => {
                    snapsht_info!("CreateBatch request_id={} urls={}", request_id, urls.len());
                    self.client.create_batch(request_id, urls, options);
                }
                Effect::StartPolling {
                    request_id,
                    batch_id,
                } => {
                    snapsht_info!("StartPolling request_id={} batch_id={}", request_id, batch_id);
                    self.client.start_polling(request_id, batch_id);
                }
                Effect::CancelPolling { request_id } => {
                    snapsht_info!("CancelPolling request_id={}", request_id);
                    self.client.cancel_polling(request_id);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next client event.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.client.recv_timeout(timeout).map(event_to_msg)
    }
}

impl Drop for EffectRunner {
    fn drop(&mut self) {
        self.client.cancel_all();
    }
}

pub fn event_to_msg(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::ScreenshotFinished { request_id, result } => Msg::ScreenshotFinished {
            request_id,
            result: result.map_err(|err| describe_failure("Screenshot", err)),
        },
        ClientEvent::VideoFinished { request_id, result } => Msg::VideoFinished {
            request_id,
            result: result.map_err(|err| describe_failure("Video", err)),
        },
        ClientEvent::BatchCreated { request_id, result } => Msg::BatchCreated {
            request_id,
            result: result.map_err(|err| describe_failure("Batch", err)),
        },
        ClientEvent::BatchStatus { request_id, result } => Msg::BatchStatusPolled {
            request_id,
            result: result.map_err(|err| describe_failure("Batch status", err)),
        },
        ClientEvent::PollExhausted {
            request_id,
            attempts,
        } => {
            snapsht_warn!("Poll request_id={} gave up after {} attempts", request_id, attempts);
            Msg::BatchPollExhausted {
                request_id,
                attempts,
            }
        }
    }
}

fn describe_failure(what: &str, err: ClientError) -> String {
    snapsht_warn!("{} request failed ({}): {}", what, err.kind, err.message);
    err.message
}
