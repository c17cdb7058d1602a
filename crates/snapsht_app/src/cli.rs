use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use snapsht_core::{CaptureKind, ImageFormat, ScreenshotForm, ScrollSpeed, VideoForm, VideoFormat};

#[derive(Debug, Parser)]
#[command(
    name = "snapsht",
    version,
    about = "Request screenshots and scrolling videos from a capture service"
)]
pub struct Cli {
    /// RON config file; defaults to ./snapsht.ron when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Service address, e.g. http://localhost:8000.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Also write the log to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture a screenshot of one page.
    Screenshot(ScreenshotArgs),
    /// Record a scrolling video of one page.
    Video(VideoArgs),
    /// Screenshot many pages and follow the batch until it finishes.
    Batch(BatchArgs),
    /// Show the status of an existing batch.
    Status {
        batch_id: String,
        /// Keep polling until the batch finishes.
        #[arg(long)]
        watch: bool,
    },
    /// Check service health and readiness.
    Health,
    /// Fetch an artifact by its download path.
    Download {
        /// Server-relative path such as /files/abc.png.
        path: String,
        /// Local filename; derived from the path when omitted.
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        download_dir: Option<PathBuf>,
    },
    /// Delete a stored capture.
    Delete {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ScreenshotArgs {
    pub url: String,
    #[arg(long, default_value_t = 1280)]
    pub width: u32,
    #[arg(long, default_value_t = 720)]
    pub height: u32,
    /// Capture only the viewport.
    #[arg(long)]
    pub no_full_page: bool,
    #[arg(long, value_enum, default_value_t = ImageFormatArg::Png)]
    pub format: ImageFormatArg,
    /// JPEG/WebP quality, 1-100.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,
    /// Extra wait before capturing, in milliseconds.
    #[arg(long)]
    pub wait_for: Option<u32>,
    /// CSS selector to capture instead of the page.
    #[arg(long)]
    pub selector: Option<String>,
    #[arg(long)]
    pub dismiss_popups: Option<bool>,
    /// Save the result into this directory.
    #[arg(long)]
    pub download_dir: Option<PathBuf>,
}

impl ScreenshotArgs {
    pub fn to_form(&self) -> ScreenshotForm {
        ScreenshotForm {
            url: self.url.clone(),
            width: self.width,
            height: self.height,
            full_page: !self.no_full_page,
            format: self.format.into(),
            quality: self.quality,
            wait_for: self.wait_for,
            selector: self.selector.clone(),
            dismiss_popups: self.dismiss_popups,
        }
    }
}

#[derive(Debug, Args)]
pub struct VideoArgs {
    pub url: String,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
    /// Recording length in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub duration: u32,
    #[arg(long, default_value_t = 24)]
    pub fps: u32,
    #[arg(long, value_enum, default_value_t = VideoFormatArg::Mp4)]
    pub format: VideoFormatArg,
    #[arg(long, value_enum, default_value_t = ScrollSpeedArg::Medium)]
    pub scroll_speed: ScrollSpeedArg,
    /// Fraction of the page to scroll through, 0.0-1.0.
    #[arg(long)]
    pub scroll_depth: Option<f32>,
    #[arg(long)]
    pub max_scroll_px: Option<u32>,
    #[arg(long)]
    pub pause_multiplier: Option<f32>,
    #[arg(long)]
    pub dismiss_popups: Option<bool>,
    #[arg(long)]
    pub download_dir: Option<PathBuf>,
}

impl VideoArgs {
    pub fn to_form(&self) -> VideoForm {
        VideoForm {
            url: self.url.clone(),
            width: self.width,
            height: self.height,
            duration_ms: self.duration,
            fps: self.fps,
            format: self.format.into(),
            scroll_speed: self.scroll_speed.into(),
            scroll_depth: self.scroll_depth,
            max_scroll_px: self.max_scroll_px,
            pause_multiplier: self.pause_multiplier,
            dismiss_popups: self.dismiss_popups,
        }
    }
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Urls to capture; combined with --file.
    pub urls: Vec<String>,
    /// Read urls from a file, one per line ("-" for stdin).
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub no_full_page: bool,
    #[arg(long)]
    pub download_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormatArg {
    Png,
    Jpeg,
    Webp,
}

impl From<ImageFormatArg> for ImageFormat {
    fn from(value: ImageFormatArg) -> Self {
        match value {
            ImageFormatArg::Png => ImageFormat::Png,
            ImageFormatArg::Jpeg => ImageFormat::Jpeg,
            ImageFormatArg::Webp => ImageFormat::Webp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VideoFormatArg {
    Mp4,
    Webm,
    Gif,
}

impl From<VideoFormatArg> for VideoFormat {
    fn from(value: VideoFormatArg) -> Self {
        match value {
            VideoFormatArg::Mp4 => VideoFormat::Mp4,
            VideoFormatArg::Webm => VideoFormat::Webm,
            VideoFormatArg::Gif => VideoFormat::Gif,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScrollSpeedArg {
    Slow,
    Medium,
    Fast,
    Realistic,
}

impl From<ScrollSpeedArg> for ScrollSpeed {
    fn from(value: ScrollSpeedArg) -> Self {
        match value {
            ScrollSpeedArg::Slow => ScrollSpeed::Slow,
            ScrollSpeedArg::Medium => ScrollSpeed::Medium,
            ScrollSpeedArg::Fast => ScrollSpeed::Fast,
            ScrollSpeedArg::Realistic => ScrollSpeed::Realistic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Screenshot,
    Video,
}

impl From<KindArg> for CaptureKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Screenshot => CaptureKind::Screenshot,
            KindArg::Video => CaptureKind::Video,
        }
    }
}
