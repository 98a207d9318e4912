use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::{debug, warn};

/// Named resize bucket for a weather bitmap. The vocabulary of icon codes is
/// closed and small, so the cache never needs eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconVariant {
    /// Current-conditions icon at native size.
    Current,
    /// Current-conditions icon on the compact canvas.
    CurrentCompact,
    /// Hourly-strip mini icon at native size.
    Forecast,
    /// Hourly-strip mini icon on the compact canvas.
    ForecastCompact,
}

impl IconVariant {
    pub fn for_current(compact: bool) -> Self {
        if compact {
            Self::CurrentCompact
        } else {
            Self::Current
        }
    }

    pub fn for_forecast(compact: bool) -> Self {
        if compact {
            Self::ForecastCompact
        } else {
            Self::Forecast
        }
    }

    /// Resample ratio applied to the bundled bitmap.
    fn scale(self) -> f32 {
        match self {
            Self::Current | Self::Forecast => 1.0,
            Self::CurrentCompact => 0.75,
            Self::ForecastCompact => 1.25,
        }
    }
}

/// Icon bitmap store with a session-wide cache.
///
/// The first request for a `(code, variant)` pair decodes the bundled PNG,
/// resamples it when the variant calls for it, and caches the result; every
/// later request gets the same bitmap back. Entries are immutable once
/// inserted. A missing or undecodable resource is logged and reported as
/// absent so cells simply render without the icon.
pub struct IconLibrary {
    dir: PathBuf,
    cache: Mutex<HashMap<(String, IconVariant), Arc<RgbaImage>>>,
}

impl IconLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn resolve(&self, code: &str, variant: IconVariant) -> Option<Arc<RgbaImage>> {
        let key = (code.to_string(), variant);
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(hit) = cache.get(&key) {
            return Some(Arc::clone(hit));
        }

        let path = self.dir.join(format!("{code}.png"));
        let bitmap = match load_icon(&path, variant.scale()) {
            Some(bitmap) => Arc::new(bitmap),
            None => return None,
        };
        debug!("cached icon {code} ({variant:?}), {}x{}", bitmap.width(), bitmap.height());
        cache.insert(key, Arc::clone(&bitmap));
        Some(bitmap)
    }
}

fn load_icon(path: &Path, scale: f32) -> Option<RgbaImage> {
    let decoded = match image::open(path) {
        Ok(decoded) => decoded.to_rgba8(),
        Err(err) => {
            warn!("icon {} unavailable: {err}", path.display());
            return None;
        }
    };
    if scale == 1.0 {
        return Some(decoded);
    }
    let w = ((decoded.width() as f32 * scale).round() as u32).max(1);
    let h = ((decoded.height() as f32 * scale).round() as u32).max(1);
    Some(imageops::resize(&decoded, w, h, FilterType::CatmullRom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;

    fn write_icon(dir: &Path, code: &str, size: u32) {
        let img = RgbaImage::from_pixel(size, size, Rgba([10, 20, 30, 255]));
        img.save(dir.join(format!("{code}.png"))).unwrap();
    }

    #[test]
    fn test_resolve_decodes_once_and_reuses() {
        let dir = tempfile::tempdir().unwrap();
        write_icon(dir.path(), "10d", 64);
        let icons = IconLibrary::new(dir.path());

        let first = icons.resolve("10d", IconVariant::Current).unwrap();
        // Removing the backing file proves the second hit never re-decodes.
        fs::remove_file(dir.path().join("10d.png")).unwrap();
        let second = icons.resolve("10d", IconVariant::Current).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_compact_current_downscaled_by_three_quarters() {
        let dir = tempfile::tempdir().unwrap();
        write_icon(dir.path(), "10d", 64);
        let icons = IconLibrary::new(dir.path());

        let compact = icons.resolve("10d", IconVariant::CurrentCompact).unwrap();
        assert_eq!(compact.dimensions(), (48, 48));

        // Reused unchanged within the same session.
        let again = icons.resolve("10d", IconVariant::CurrentCompact).unwrap();
        assert!(Arc::ptr_eq(&compact, &again));
    }

    #[test]
    fn test_compact_forecast_upscaled() {
        let dir = tempfile::tempdir().unwrap();
        write_icon(dir.path(), "01n", 20);
        let icons = IconLibrary::new(dir.path());
        let mini = icons.resolve("01n", IconVariant::ForecastCompact).unwrap();
        assert_eq!(mini.dimensions(), (25, 25));
    }

    #[test]
    fn test_variants_cached_independently() {
        let dir = tempfile::tempdir().unwrap();
        write_icon(dir.path(), "10d", 64);
        let icons = IconLibrary::new(dir.path());
        let full = icons.resolve("10d", IconVariant::Current).unwrap();
        let compact = icons.resolve("10d", IconVariant::CurrentCompact).unwrap();
        assert!(!Arc::ptr_eq(&full, &compact));
        assert_ne!(full.dimensions(), compact.dimensions());
    }

    #[test]
    fn test_missing_icon_is_absent_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let icons = IconLibrary::new(dir.path());
        assert!(icons.resolve("99x", IconVariant::Current).is_none());
    }
}
