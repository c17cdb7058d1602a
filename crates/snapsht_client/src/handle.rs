use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use snapsht_core::{
    BatchStatus, BatchTicket, RequestId, ScreenshotOptions, ScreenshotRequest, ScreenshotResult,
    VideoRequest, VideoResult,
};
use snapsht_logging::{snapsht_debug, snapsht_info};
use tokio_util::sync::CancellationToken;

use crate::poll::{poll_batch, PollOutcome, PollPolicy, StatusSink};
use crate::{CaptureApi, ClientError};

enum ClientCommand {
    Screenshot {
        request_id: RequestId,
        request: ScreenshotRequest,
    },
    Video {
        request_id: RequestId,
        request: VideoRequest,
    },
    CreateBatch {
        request_id: RequestId,
        urls: Vec<String>,
        options: Option<ScreenshotOptions>,
    },
    StartPolling {
        request_id: RequestId,
        batch_id: String,
    },
    CancelPolling {
        request_id: RequestId,
    },
    CancelAll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    ScreenshotFinished {
        request_id: RequestId,
        result: Result<ScreenshotResult, ClientError>,
    },
    VideoFinished {
        request_id: RequestId,
        result: Result<VideoResult, ClientError>,
    },
    BatchCreated {
        request_id: RequestId,
        result: Result<BatchTicket, ClientError>,
    },
    /// One status poll resolved; a failure ends the poll.
    BatchStatus {
        request_id: RequestId,
        result: Result<BatchStatus, ClientError>,
    },
    PollExhausted {
        request_id: RequestId,
        attempts: u32,
    },
}

/// Runs remote calls and poll loops on a background tokio runtime.
///
/// Dropping the handle stops the worker thread and its runtime, which aborts
/// every poll loop still waiting.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(api: Arc<dyn CaptureApi>, policy: PollPolicy) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("snapsht-client".to_string())
            .spawn(move || {
                let mut polls: HashMap<RequestId, CancellationToken> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    // Finished loops cancel their own token.
                    polls.retain(|_, token| !token.is_cancelled());
                    match command {
                        ClientCommand::StartPolling {
                            request_id,
                            batch_id,
                        } => {
                            let token = CancellationToken::new();
                            polls.insert(request_id, token.clone());
                            runtime.spawn(run_poll(
                                api.clone(),
                                policy.clone(),
                                request_id,
                                batch_id,
                                token,
                                event_tx.clone(),
                            ));
                        }
                        ClientCommand::CancelPolling { request_id } => {
                            if let Some(token) = polls.remove(&request_id) {
                                snapsht_info!("Cancelling poll request_id={}", request_id);
                                token.cancel();
                            }
                        }
                        ClientCommand::CancelAll => {
                            for (_, token) in polls.drain() {
                                token.cancel();
                            }
                        }
                        command => {
                            let api = api.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                handle_request(api.as_ref(), command, event_tx).await;
                            });
                        }
                    }
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit_screenshot(&self, request_id: RequestId, request: ScreenshotRequest) {
        self.send(ClientCommand::Screenshot {
            request_id,
            request,
        });
    }

    pub fn submit_video(&self, request_id: RequestId, request: VideoRequest) {
        self.send(ClientCommand::Video {
            request_id,
            request,
        });
    }

    pub fn create_batch(
        &self,
        request_id: RequestId,
        urls: Vec<String>,
        options: Option<ScreenshotOptions>,
    ) {
        self.send(ClientCommand::CreateBatch {
            request_id,
            urls,
            options,
        });
    }

    pub fn start_polling(&self, request_id: RequestId, batch_id: impl Into<String>) {
        self.send(ClientCommand::StartPolling {
            request_id,
            batch_id: batch_id.into(),
        });
    }

    pub fn cancel_polling(&self, request_id: RequestId) {
        self.send(ClientCommand::CancelPolling { request_id });
    }

    /// Cancels every poll loop still running; single requests finish.
    pub fn cancel_all(&self) {
        self.send(ClientCommand::CancelAll);
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: ClientCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_request(
    api: &dyn CaptureApi,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    let event = match command {
        ClientCommand::Screenshot {
            request_id,
            request,
        } => {
            snapsht_debug!("Submitting screenshot request_id={} url={}", request_id, request.url);
            ClientEvent::ScreenshotFinished {
                request_id,
                result: api.capture_screenshot(&request).await,
            }
        }
        ClientCommand::Video {
            request_id,
            request,
        } => {
            snapsht_debug!("Submitting video request_id={} url={}", request_id, request.url);
            ClientEvent::VideoFinished {
                request_id,
                result: api.capture_video(&request).await,
            }
        }
        ClientCommand::CreateBatch {
            request_id,
            urls,
            options,
        } => {
            snapsht_debug!("Creating batch request_id={} urls={}", request_id, urls.len());
            ClientEvent::BatchCreated {
                request_id,
                result: api.create_batch(&urls, options.as_ref()).await,
            }
        }
        ClientCommand::StartPolling { .. }
        | ClientCommand::CancelPolling { .. }
        | ClientCommand::CancelAll => return,
    };
    let _ = event_tx.send(event);
}

struct ChannelStatusSink {
    request_id: RequestId,
    tx: mpsc::Sender<ClientEvent>,
}

impl StatusSink for ChannelStatusSink {
    fn on_status(&self, status: &BatchStatus) {
        let _ = self.tx.send(ClientEvent::BatchStatus {
            request_id: self.request_id,
            result: Ok(status.clone()),
        });
    }
}

async fn run_poll(
    api: Arc<dyn CaptureApi>,
    policy: PollPolicy,
    request_id: RequestId,
    batch_id: String,
    token: CancellationToken,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    let sink = ChannelStatusSink {
        request_id,
        tx: event_tx.clone(),
    };
    let outcome = poll_batch(api.as_ref(), &batch_id, &policy, &token, &sink).await;
    match outcome {
        PollOutcome::Terminal(_) => {}
        PollOutcome::Failed(err) => {
            let _ = event_tx.send(ClientEvent::BatchStatus {
                request_id,
                result: Err(err),
            });
        }
        PollOutcome::Exhausted { attempts, .. } => {
            let _ = event_tx.send(ClientEvent::PollExhausted {
                request_id,
                attempts,
            });
        }
        PollOutcome::Cancelled => {
            snapsht_debug!("Poll for batch {} cancelled", batch_id);
        }
    }
    token.cancel();
}
