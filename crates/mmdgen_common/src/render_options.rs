//! Renderer invocation options.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default render timeout. Timeouts are reported distinctly from syntax
/// failures so the matcher never scores them against parse-error entries.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Scale factor bounds accepted by mmdc.
pub const MIN_SCALE: u32 = 1;
pub const MAX_SCALE: u32 = 3;

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
    Pdf,
}

impl Default for ImageFormat {
    fn default() -> Self {
        Self::Png
    }
}

impl ImageFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Mermaid theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Default,
    Forest,
    Dark,
    Neutral,
    Base,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Default
    }
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Forest => "forest",
            Theme::Dark => "dark",
            Theme::Neutral => "neutral",
            Theme::Base => "base",
        }
    }

    /// Parse a theme name, falling back to the default theme on anything
    /// unrecognized.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "forest" => Theme::Forest,
            "dark" => Theme::Dark,
            "neutral" => Theme::Neutral,
            "base" => Theme::Base,
            _ => Theme::Default,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options passed through to the external renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub theme: Theme,

    /// Background color, e.g. "transparent" or "white".
    #[serde(default = "default_background")]
    pub background: String,

    /// Output width in pixels.
    #[serde(default)]
    pub width: Option<u32>,

    /// Output height in pixels.
    #[serde(default)]
    pub height: Option<u32>,

    /// Scale factor; values outside 1..=3 are clamped.
    #[serde(default = "default_scale")]
    pub scale: u32,

    /// Render timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_background() -> String {
    "transparent".to_string()
}

fn default_scale() -> u32 {
    MIN_SCALE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            background: default_background(),
            width: None,
            height: None,
            scale: default_scale(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RenderOptions {
    /// Scale factor with the mmdc bounds applied.
    pub fn clamped_scale(&self) -> u32 {
        self.scale.clamp(MIN_SCALE, MAX_SCALE)
    }
}
