//! Renders a fixed-layout sensor dashboard into an RGBA pixel buffer.
//!
//! The pipeline runs in three stages, all synchronous: raw timestamped
//! samples reduce to an ordered, gap-padded measurement list
//! ([`measure::reduce`]), the list maps onto a two-column grid of
//! heterogeneous cells ([`layout::layout`]), and the compositor draws cells,
//! separators and the update stamp into a buffer ([`compose::render`]) that
//! an [`sink::OutputSink`] persists.
//!
//! Upstream failures never reach the renderer as errors: a sensor without
//! samples becomes an empty measurement, a failed weather fetch means no
//! weather section, a missing icon is skipped. Only unusable configuration,
//! an unloadable font, or an unwritable destination abort a canvas.

pub mod canvas;
pub mod color;
pub mod compose;
pub mod config;
pub mod error;
pub mod icons;
pub mod layout;
pub mod measure;
pub mod sink;
pub mod text;
pub mod weather;

pub use color::Color;
pub use compose::render;
pub use config::CanvasConfig;
pub use error::RenderError;
pub use icons::{IconLibrary, IconVariant};
pub use measure::{parse_sensor_order, reduce, Measurement, RawSample};
pub use sink::{OutputSink, PngSink};
pub use text::Fonts;
pub use weather::{ForecastPoint, WeatherSnapshot};
