//! Snapsht client: HTTP adapter for the capture service, batch status
//! polling and the background runtime that executes core effects.
mod api;
mod error;
mod filename;
mod handle;
mod poll;
mod save;
mod settings;

pub use api::{CaptureApi, ReqwestCaptureClient};
pub use error::{ClientError, FailureKind, Operation};
pub use filename::artifact_filename;
pub use handle::{ClientEvent, ClientHandle};
pub use poll::{poll_batch, PollOutcome, PollPolicy, PollStep, StatusSink};
pub use save::{ensure_output_dir, AtomicFileWriter, SaveError};
pub use settings::{ClientSettings, DEFAULT_BASE_URL};
