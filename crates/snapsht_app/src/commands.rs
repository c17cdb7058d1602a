//! One-shot commands that talk to the service without the dashboard.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use snapsht_client::{
    artifact_filename, poll_batch, AtomicFileWriter, CaptureApi, PollOutcome, PollPolicy,
    ReqwestCaptureClient, StatusSink,
};
use snapsht_core::{BatchStatus, CaptureKind};
use snapsht_logging::{snapsht_info, snapsht_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::render::render_status;

/// An artifact the service reported, to be fetched into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: Option<String>,
    pub download_path: String,
}

pub struct Commands {
    runtime: Runtime,
    client: Arc<ReqwestCaptureClient>,
}

impl Commands {
    pub fn new(client: Arc<ReqwestCaptureClient>) -> Result<Self> {
        let runtime = Runtime::new().context("could not start tokio runtime")?;
        Ok(Self { runtime, client })
    }

    pub fn health(&self) -> Result<()> {
        let report = self.runtime.block_on(self.client.health())?;
        println!("Service: {}", report.status);
        println!("Timestamp: {}", report.timestamp);
        println!("Uptime: {:.0}s", report.uptime);
        println!("Browser: {}", report.browser);

        let readiness = self.runtime.block_on(self.client.readiness())?;
        if readiness.ready {
            println!("Ready: yes");
            Ok(())
        } else {
            let reason = readiness.reason.unwrap_or_else(|| "no reason given".to_string());
            bail!("service not ready: {reason}")
        }
    }

    pub fn status(&self, batch_id: &str, watch: Option<PollPolicy>) -> Result<()> {
        let resolve = self.resolver();
        let Some(policy) = watch else {
            let status = self.runtime.block_on(self.client.batch_status(batch_id))?;
            print_lines(&render_status(&status, &resolve));
            return Ok(());
        };

        let cancel = CancellationToken::new();
        let sink = PrintingSink {
            resolve: Box::new(resolve),
        };
        let outcome = self.runtime.block_on(async {
            let ctrl_c_cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c_cancel.cancel();
                }
            });
            poll_batch(self.client.as_ref(), batch_id, &policy, &cancel, &sink).await
        });

        match outcome {
            PollOutcome::Terminal(status) => {
                snapsht_info!("Batch {} ended as {}", batch_id, status.status);
                Ok(())
            }
            PollOutcome::Failed(err) => Err(err.into()),
            PollOutcome::Cancelled => {
                println!("Stopped watching batch {batch_id}");
                Ok(())
            }
            PollOutcome::Exhausted { attempts, last } => bail!(
                "batch {} still {} after {} status checks",
                batch_id,
                last.status,
                attempts
            ),
        }
    }

    pub fn download(&self, path: &str, name: Option<&str>, out_dir: &Path) -> Result<PathBuf> {
        self.save(
            &Artifact {
                filename: name.map(str::to_string),
                download_path: path.to_string(),
            },
            out_dir,
        )
    }

    pub fn delete(&self, kind: CaptureKind, id: &str) -> Result<()> {
        self.runtime.block_on(self.client.delete_capture(kind, id))?;
        println!("Deleted {} {}", kind.api_segment(), id);
        Ok(())
    }

    /// Downloads every artifact; failures are logged and counted, not fatal
    /// for the remaining artifacts.
    pub fn save_all(&self, artifacts: &[Artifact], out_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut saved = Vec::with_capacity(artifacts.len());
        let mut failures = 0usize;
        for artifact in artifacts {
            match self.save(artifact, out_dir) {
                Ok(path) => saved.push(path),
                Err(err) => {
                    snapsht_warn!("Could not save {}: {:#}", artifact.download_path, err);
                    failures += 1;
                }
            }
        }
        if failures > 0 {
            bail!("{failures} of {} downloads failed", artifacts.len());
        }
        Ok(saved)
    }

    fn save(&self, artifact: &Artifact, out_dir: &Path) -> Result<PathBuf> {
        let bytes = self
            .runtime
            .block_on(self.client.download(&artifact.download_path))?;
        let filename = artifact_filename(artifact.filename.as_deref(), &artifact.download_path);
        let path = AtomicFileWriter::new(out_dir.to_path_buf())
            .write(&filename, &bytes)
            .with_context(|| format!("could not write {filename}"))?;
        println!("Saved {}", path.display());
        Ok(path)
    }

    fn resolver(&self) -> impl Fn(&str) -> String + Send + Sync + 'static {
        let client = self.client.clone();
        move |path: &str| client.download_url(path)
    }
}

struct PrintingSink {
    resolve: Box<dyn Fn(&str) -> String + Send + Sync>,
}

impl StatusSink for PrintingSink {
    fn on_status(&self, status: &BatchStatus) {
        print_lines(&render_status(status, &*self.resolve));
    }
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
