use std::path::PathBuf;

use bon::Builder;
use serde::Deserialize;

/// One output resolution to render. A cycle typically renders several of
/// these sequentially (e.g. a full-size panel and a compact one).
#[derive(Debug, Clone, Builder, Deserialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,

    /// Value font height in pixels.
    #[builder(default = 90.0)]
    pub font_large: f32,
    /// Label font height in pixels.
    #[builder(default = 24.0)]
    pub font_medium: f32,
    /// Badge / timestamp / forecast-strip font height in pixels.
    #[builder(default = 16.0)]
    pub font_small: f32,

    /// Inner margin: the grid is composed on a working canvas inset by this
    /// many pixels on every side, then copied centered into the output.
    #[builder(default = 0)]
    #[serde(default)]
    pub inset: u32,

    /// Compact canvases get resampled icon variants (0.75x current icon,
    /// 1.25x forecast mini-icons).
    #[builder(default = false)]
    #[serde(default)]
    pub compact: bool,

    /// Where the output sink writes the finished image.
    pub destination: PathBuf,
}

impl CanvasConfig {
    /// Width of the working canvas the grid partitions.
    pub fn work_width(&self) -> u32 {
        self.width.saturating_sub(self.inset * 2)
    }

    /// Height of the working canvas the grid partitions.
    pub fn work_height(&self) -> u32 {
        self.height.saturating_sub(self.inset * 2)
    }
}
