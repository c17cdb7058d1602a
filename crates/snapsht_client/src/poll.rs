//! Batch status polling.
//!
//! A poll loop issues one status request at a time, waits a fixed interval
//! while the batch is pending or processing, and stops on the first terminal
//! status, the first failure, cancellation, or when its policy bound runs out.

use std::time::Duration;

use snapsht_core::BatchStatus;
use snapsht_logging::{snapsht_debug, snapsht_info, snapsht_warn};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{CaptureApi, ClientError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Constant delay between a response and the next request.
    pub interval: Duration,
    /// Maximum number of status requests; `None` for no cap.
    pub max_attempts: Option<u32>,
    /// Maximum time since the first request; `None` for no limit.
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            max_attempts: None,
            deadline: Some(Duration::from_secs(30 * 60)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    Continue { delay: Duration },
    Stop,
}

impl PollPolicy {
    /// Decides what follows a status response.
    pub fn next_step(&self, status: &BatchStatus) -> PollStep {
        if status.is_terminal() {
            PollStep::Stop
        } else {
            PollStep::Continue {
                delay: self.interval,
            }
        }
    }

    /// True when another request after `attempts` requests and `elapsed`
    /// time (plus the pending delay) would break the bound.
    fn is_exhausted(&self, attempts: u32, elapsed: Duration) -> bool {
        if self.max_attempts.is_some_and(|max| attempts >= max) {
            return true;
        }
        self.deadline
            .is_some_and(|deadline| elapsed + self.interval > deadline)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The batch reached a status other than pending/processing.
    Terminal(BatchStatus),
    /// A status request failed; polling stops without retry.
    Failed(ClientError),
    Cancelled,
    /// The policy bound ran out while the batch was still running.
    Exhausted { attempts: u32, last: BatchStatus },
}

/// Receives every status snapshot, terminal ones included.
pub trait StatusSink: Send + Sync {
    fn on_status(&self, status: &BatchStatus);
}

pub async fn poll_batch(
    api: &dyn CaptureApi,
    batch_id: &str,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    sink: &dyn StatusSink,
) -> PollOutcome {
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            result = api.batch_status(batch_id) => result,
        };
        attempts += 1;

        let status = match result {
            Ok(status) => status,
            Err(err) => {
                snapsht_warn!(
                    "Polling batch {} failed after {} attempts: {}",
                    batch_id,
                    attempts,
                    err
                );
                return PollOutcome::Failed(err);
            }
        };
        snapsht_debug!(
            "Batch {} is {} ({:.1}%)",
            batch_id,
            status.status,
            status.progress
        );
        sink.on_status(&status);

        let delay = match policy.next_step(&status) {
            PollStep::Stop => {
                snapsht_info!("Batch {} finished as {}", batch_id, status.status);
                return PollOutcome::Terminal(status);
            }
            PollStep::Continue { delay } => delay,
        };

        if policy.is_exhausted(attempts, started.elapsed()) {
            snapsht_warn!(
                "Giving up on batch {} after {} attempts",
                batch_id,
                attempts
            );
            return PollOutcome::Exhausted {
                attempts,
                last: status,
            };
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
