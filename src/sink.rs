use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use log::info;

use crate::error::RenderError;

/// Consumer of a finished pixel buffer. The core's responsibility ends at
/// producing the buffer; sinks own persistence and any further transforms.
pub trait OutputSink {
    fn write(&self, image: &RgbaImage, destination: &Path) -> Result<(), RenderError>;
}

/// Writes the buffer as PNG through a buffered file handle, flushed on every
/// success path and closed on every exit path.
pub struct PngSink;

impl OutputSink for PngSink {
    fn write(&self, image: &RgbaImage, destination: &Path) -> Result<(), RenderError> {
        let io_err = |source| RenderError::Output {
            path: PathBuf::from(destination),
            source,
        };

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = File::create(destination).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|source| RenderError::Encode {
                path: PathBuf::from(destination),
                source,
            })?;
        writer.flush().map_err(io_err)?;

        info!("wrote {}", destination.display());
        Ok(())
    }
}
