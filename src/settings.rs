use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use infoscreen::CanvasConfig;

/// Binary-side settings file: resource paths, the sensor wiring, and the
/// list of canvases to render each cycle.
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub paths: PathsConfig,
    pub sensors: SensorConfig,
    pub canvas: Vec<CanvasConfig>,
}

#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    pub label_font: PathBuf,
    pub value_font: PathBuf,
    pub icon_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct SensorConfig {
    /// Semicolon-delimited display order, matched against labels.
    pub order: String,
    /// Sensor id -> display label.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let settings = toml::from_str(&content)?;
        Ok(settings)
    }
}
