//! User-entered request parameters for each panel.

use crate::model::{
    ImageFormat, ScreenshotOptions, ScreenshotRequest, ScrollSpeed, VideoFormat, VideoRequest,
};

const DEFAULT_URL: &str = "https://example.com";

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotForm {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub full_page: bool,
    pub format: ImageFormat,
    pub quality: Option<u8>,
    pub wait_for: Option<u32>,
    pub selector: Option<String>,
    pub dismiss_popups: Option<bool>,
}

impl Default for ScreenshotForm {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            width: 1280,
            height: 720,
            full_page: true,
            format: ImageFormat::Png,
            quality: None,
            wait_for: None,
            selector: None,
            dismiss_popups: None,
        }
    }
}

impl ScreenshotForm {
    pub fn can_submit(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn to_request(&self) -> ScreenshotRequest {
        ScreenshotRequest {
            url: self.url.trim().to_string(),
            options: ScreenshotOptions {
                width: Some(self.width),
                height: Some(self.height),
                full_page: Some(self.full_page),
                format: Some(self.format),
                quality: self.quality,
                wait_for: self.wait_for,
                selector: self.selector.clone(),
                dismiss_popups: self.dismiss_popups,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoForm {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_ms: u32,
    pub fps: u32,
    pub format: VideoFormat,
    pub scroll_speed: ScrollSpeed,
    pub scroll_depth: Option<f32>,
    pub max_scroll_px: Option<u32>,
    pub pause_multiplier: Option<f32>,
    pub dismiss_popups: Option<bool>,
}

impl Default for VideoForm {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            width: None,
            height: None,
            duration_ms: 5000,
            fps: 24,
            format: VideoFormat::Mp4,
            scroll_speed: ScrollSpeed::Medium,
            scroll_depth: None,
            max_scroll_px: None,
            pause_multiplier: None,
            dismiss_popups: None,
        }
    }
}

impl VideoForm {
    pub fn can_submit(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn to_request(&self) -> VideoRequest {
        VideoRequest {
            url: self.url.trim().to_string(),
            width: self.width,
            height: self.height,
            duration: Some(self.duration_ms),
            fps: Some(self.fps),
            format: Some(self.format),
            scroll_speed: Some(self.scroll_speed),
            scroll_depth: self.scroll_depth,
            max_scroll_px: self.max_scroll_px,
            pause_multiplier: self.pause_multiplier,
            dismiss_popups: self.dismiss_popups,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchForm {
    /// Raw multi-line input, one url per line.
    pub urls_text: String,
    pub full_page: bool,
}

impl Default for BatchForm {
    fn default() -> Self {
        Self {
            urls_text: String::new(),
            full_page: true,
        }
    }
}

impl BatchForm {
    pub fn urls(&self) -> Vec<String> {
        parse_urls(&self.urls_text)
    }

    pub fn can_submit(&self) -> bool {
        self.urls_text.lines().any(|line| !line.trim().is_empty())
    }

    pub fn to_options(&self) -> ScreenshotOptions {
        ScreenshotOptions {
            full_page: Some(self.full_page),
            ..ScreenshotOptions::default()
        }
    }
}

/// Splits raw input into trimmed, non-blank lines.
pub fn parse_urls(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
