use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the rendering pipeline.
///
/// Icon failures are deliberately absent: a missing or unreadable icon is
/// logged and the cell renders without it.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Sensor ordering list or label mapping missing/malformed. Aborts the cycle.
    #[error("configuration error: {0}")]
    Config(String),

    /// A font file could not be read. No face means nothing can be rendered.
    #[error("failed to read font {}: {source}", path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A font file was read but is not a usable TTF/OTF face.
    #[error("font {} could not be parsed", path.display())]
    FontParse { path: PathBuf },

    /// Measurement count does not match the cell template.
    #[error("layout expects {expected} measurements, got {got}")]
    Layout { expected: usize, got: usize },

    /// The finished buffer could not be written to its destination.
    /// Fatal for that canvas only; remaining canvases are still attempted.
    #[error("failed to write image to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The finished buffer could not be encoded.
    #[error("failed to encode image for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
