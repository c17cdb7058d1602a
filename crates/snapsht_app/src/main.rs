mod cli;
mod commands;
mod config;
mod dashboard;
mod effects;
mod render;

use std::io::{self, Read, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use snapsht_client::{ClientHandle, PollPolicy, ReqwestCaptureClient};
use snapsht_core::{BatchState, BatchStatus, JobState, Msg, Panel, PanelPhase};
use snapsht_logging::{level_from_verbosity, snapsht_info, LogDestination};

use crate::cli::{BatchArgs, Cli, Command};
use crate::commands::{Artifact, Commands};
use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::effects::EffectRunner;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    snapsht_logging::initialize(destination, level_from_verbosity(cli.verbose));

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let working_dir = std::env::current_dir().context("could not read working directory")?;
    let mut config = AppConfig::load(cli.config.as_deref(), &working_dir)?;
    config.apply_env(|key| std::env::var(key).ok());
    config.apply_overrides(cli.base_url.clone(), command_download_dir(&cli.command));

    let policy = config.poll_policy()?;
    let client = Arc::new(ReqwestCaptureClient::new(config.client_settings())?);
    snapsht_info!("Using capture service at {}", client.base_url());

    match cli.command {
        Command::Screenshot(args) => {
            let form = args.to_form();
            if !form.can_submit() {
                bail!("a url is required");
            }
            let mut dashboard = open_dashboard(&client, policy)?;
            dashboard.dispatch(Msg::TabSelected(Panel::Screenshot))?;
            dashboard.dispatch(Msg::ScreenshotFormChanged(form))?;
            dashboard.dispatch(Msg::CaptureScreenshotClicked)?;
            let view = dashboard.run_until_settled(Panel::Screenshot)?;
            drop(dashboard);

            match view.screenshot.phase {
                PanelPhase::Ready(result) => save_if_requested(
                    &client,
                    config.download_dir.as_deref(),
                    vec![Artifact {
                        filename: Some(result.capture.filename),
                        download_path: result.capture.download_url,
                    }],
                ),
                PanelPhase::Failed(message) => bail!(message),
                PanelPhase::Empty | PanelPhase::InFlight => Ok(()),
            }
        }
        Command::Video(args) => {
            let form = args.to_form();
            if !form.can_submit() {
                bail!("a url is required");
            }
            let mut dashboard = open_dashboard(&client, policy)?;
            dashboard.dispatch(Msg::TabSelected(Panel::Video))?;
            dashboard.dispatch(Msg::VideoFormChanged(form))?;
            dashboard.dispatch(Msg::CaptureVideoClicked)?;
            let view = dashboard.run_until_settled(Panel::Video)?;
            drop(dashboard);

            match view.video.phase {
                PanelPhase::Ready(result) => save_if_requested(
                    &client,
                    config.download_dir.as_deref(),
                    vec![Artifact {
                        filename: Some(result.capture.filename),
                        download_path: result.capture.download_url,
                    }],
                ),
                PanelPhase::Failed(message) => bail!(message),
                PanelPhase::Empty | PanelPhase::InFlight => Ok(()),
            }
        }
        Command::Batch(args) => {
            let input = batch_input(&args)?;
            let mut dashboard = open_dashboard(&client, policy)?;
            dashboard.dispatch(Msg::TabSelected(Panel::Batch))?;
            dashboard.dispatch(Msg::BatchInputChanged(input))?;
            dashboard.dispatch(Msg::BatchFullPageChanged(!args.no_full_page))?;
            if !dashboard.state().batch_form().can_submit() {
                bail!("no urls given; pass them as arguments or with --file");
            }
            dashboard.dispatch(Msg::StartBatchClicked)?;
            let view = dashboard.run_until_settled(Panel::Batch)?;
            drop(dashboard);

            match view.batch.phase {
                PanelPhase::Ready(status) => {
                    save_if_requested(
                        &client,
                        config.download_dir.as_deref(),
                        completed_artifacts(&status),
                    )?;
                    if status.status == BatchState::Failed {
                        bail!("batch {} failed", status.batch_id);
                    }
                    Ok(())
                }
                PanelPhase::Failed(message) => bail!(message),
                PanelPhase::Empty | PanelPhase::InFlight => Ok(()),
            }
        }
        Command::Status { batch_id, watch } => {
            Commands::new(client)?.status(&batch_id, watch.then_some(policy))
        }
        Command::Health => Commands::new(client)?.health(),
        Command::Download { path, name, .. } => {
            let out_dir = config
                .download_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("."));
            Commands::new(client)?.download(&path, name.as_deref(), &out_dir)?;
            Ok(())
        }
        Command::Delete { kind, id } => Commands::new(client)?.delete(kind.into(), &id),
    }
}

fn command_download_dir(command: &Command) -> Option<PathBuf> {
    match command {
        Command::Screenshot(args) => args.download_dir.clone(),
        Command::Video(args) => args.download_dir.clone(),
        Command::Batch(args) => args.download_dir.clone(),
        Command::Download { download_dir, .. } => download_dir.clone(),
        Command::Status { .. } | Command::Health | Command::Delete { .. } => None,
    }
}

fn open_dashboard(
    client: &Arc<ReqwestCaptureClient>,
    policy: PollPolicy,
) -> Result<Dashboard<Stdout>> {
    let handle =
        ClientHandle::new(client.clone(), policy).context("could not start client runtime")?;
    let resolver = client.clone();
    Ok(Dashboard::new(
        EffectRunner::new(handle),
        Box::new(move |path: &str| resolver.download_url(path)),
        io::stdout(),
    ))
}

/// Joins positional urls and the optional url file into the batch text box.
fn batch_input(args: &BatchArgs) -> Result<String> {
    let mut input = args.urls.join("\n");
    if let Some(file) = &args.file {
        let content = if file.as_os_str() == "-" {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("could not read urls from stdin")?;
            buffer
        } else {
            std::fs::read_to_string(file)
                .with_context(|| format!("could not read urls from {}", file.display()))?
        };
        input.push('\n');
        input.push_str(&content);
    }
    Ok(input)
}

fn completed_artifacts(status: &BatchStatus) -> Vec<Artifact> {
    status
        .jobs
        .iter()
        .filter(|job| job.status == JobState::Completed)
        .filter_map(|job| job.result.as_ref())
        .map(|result| Artifact {
            filename: result.filename.clone(),
            download_path: result.download_url.clone(),
        })
        .collect()
}

fn save_if_requested(
    client: &Arc<ReqwestCaptureClient>,
    download_dir: Option<&Path>,
    artifacts: Vec<Artifact>,
) -> Result<()> {
    let Some(dir) = download_dir else {
        return Ok(());
    };
    if artifacts.is_empty() {
        return Ok(());
    }
    Commands::new(client.clone())?.save_all(&artifacts, dir)?;
    Ok(())
}
