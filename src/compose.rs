use chrono::{DateTime, Local};
use image::{imageops, Rgba, RgbaImage};
use log::debug;

use crate::canvas::Canvas;
use crate::color::{BACKGROUND, FOREGROUND};
use crate::config::CanvasConfig;
use crate::error::RenderError;
use crate::icons::{IconLibrary, IconVariant};
use crate::layout::{self, CellKind, CellSpec};
use crate::measure::Measurement;
use crate::text::{self, Align, Fonts};
use crate::weather::{WeatherSnapshot, FORECAST_HOURS};

/// Margin between cell edges and cell content.
const CELL_MARGIN: i32 = 10;

/// Gap between the age badge and the trend badge stacked left of it.
const BADGE_GAP: i32 = 4;

/// Vertical spacing between the stacked parts of a forecast column.
const STRIP_SPACING: i32 = 8;

/// Vertical space reserved for a forecast icon that failed to resolve, so
/// the temperature row stays aligned across columns.
const STRIP_ICON_SLOT: i32 = 40;

/// Margin around the "last updated" stamp.
const STAMP_MARGIN: i32 = 10;

const DEGREE: &str = "\u{00b0}";

/// Compose one dashboard frame.
///
/// Pure function of its inputs plus the shared icon cache: measurements land
/// in the template's cells in order, separators and the update stamp go on
/// top, and the working canvas is copied centered into the output buffer.
pub fn render(
    measurements: &[Measurement],
    weather: Option<&WeatherSnapshot>,
    config: &CanvasConfig,
    fonts: &Fonts,
    icons: &IconLibrary,
    now: DateTime<Local>,
) -> Result<RgbaImage, RenderError> {
    let grid = layout::layout(measurements.len(), config)?;
    let mut canvas = Canvas::new(config.work_width(), config.work_height(), BACKGROUND);

    for (measurement, cell) in measurements.iter().zip(&grid.cells) {
        match cell.kind {
            CellKind::Double => {
                draw_weather_cell(&mut canvas, fonts, icons, measurement, weather, cell, config.compact)
            }
            CellKind::Normal | CellKind::Half => {
                draw_reading_cell(&mut canvas, fonts, measurement, cell)
            }
        }
    }

    for line in &grid.separators {
        if line.x0 == line.x1 {
            canvas.rule_v(line.x0, line.y0, line.y1, FOREGROUND);
        } else {
            canvas.rule_h(line.x0, line.x1, line.y0, FOREGROUND);
        }
    }

    draw_update_stamp(&mut canvas, fonts, config.font_small, now);

    debug!(
        "composed {}x{} frame for {}",
        config.width,
        config.height,
        config.destination.display()
    );
    Ok(finish_frame(canvas, config))
}

/// Value text as rendered: "--" placeholder when empty, otherwise the
/// formatted reading with the degree glyph appended.
fn display_value(measurement: &Measurement) -> String {
    if measurement.empty {
        measurement.format_value()
    } else {
        format!("{}{DEGREE}", measurement.format_value())
    }
}

fn draw_cell_label(canvas: &mut Canvas, fonts: &Fonts, measurement: &Measurement, cell: &CellSpec) {
    let asc = text::ascent(&fonts.label, cell.label_font_px).round() as i32;
    text::draw(
        canvas,
        &fonts.label,
        cell.label_font_px,
        &measurement.label,
        cell.rect.x + CELL_MARGIN,
        cell.rect.y + CELL_MARGIN + asc,
        Align::Left,
        FOREGROUND,
    );
}

/// Age badge in the bottom-right corner, trend badge immediately left of it.
/// Either vanishes on its own when its text measures out to nothing.
fn draw_indicator_badges(canvas: &mut Canvas, fonts: &Fonts, measurement: &Measurement, cell: &CellSpec) {
    if measurement.empty {
        return;
    }
    let anchor_y = cell.rect.bottom() - CELL_MARGIN;
    let mut anchor_x = cell.rect.right() - CELL_MARGIN;
    let used = text::draw_badge(
        canvas,
        &fonts.value,
        cell.badge_font_px,
        &measurement.format_age(),
        anchor_x,
        anchor_y,
        FOREGROUND,
    );
    if used > 0 {
        anchor_x -= used + BADGE_GAP;
    }
    text::draw_badge(
        canvas,
        &fonts.value,
        cell.badge_font_px,
        &measurement.format_trend(),
        anchor_x,
        anchor_y,
        FOREGROUND,
    );
}

fn draw_reading_cell(canvas: &mut Canvas, fonts: &Fonts, measurement: &Measurement, cell: &CellSpec) {
    draw_cell_label(canvas, fonts, measurement, cell);

    let asc = text::ascent(&fonts.value, cell.value_font_px);
    let baseline = cell.rect.center_y() + ((cell.label_font_px + asc) / 2.0).round() as i32;
    text::draw(
        canvas,
        &fonts.value,
        cell.value_font_px,
        &display_value(measurement),
        cell.rect.center_x(),
        baseline,
        Align::Center,
        FOREGROUND,
    );

    draw_indicator_badges(canvas, fonts, measurement, cell);
}

fn draw_weather_cell(
    canvas: &mut Canvas,
    fonts: &Fonts,
    icons: &IconLibrary,
    measurement: &Measurement,
    weather: Option<&WeatherSnapshot>,
    cell: &CellSpec,
    compact: bool,
) {
    draw_cell_label(canvas, fonts, measurement, cell);

    // Value sits in the upper quarter, leaving the lower half to the strip.
    let asc = text::ascent(&fonts.value, cell.value_font_px);
    let baseline = cell.rect.y + cell.rect.h / 4 + (asc / 2.0).round() as i32;
    text::draw(
        canvas,
        &fonts.value,
        cell.value_font_px,
        &display_value(measurement),
        cell.rect.center_x(),
        baseline,
        Align::Center,
        FOREGROUND,
    );

    if let Some(weather) = weather {
        if let Some(bitmap) = icons.resolve(&weather.icon, IconVariant::for_current(compact)) {
            canvas.blit(&bitmap, cell.rect.x + CELL_MARGIN, cell.rect.y + CELL_MARGIN);
        }
        if !weather.hourly.is_empty() {
            draw_forecast_strip(canvas, fonts, icons, weather, cell, compact, baseline + STRIP_SPACING);
        }
    }

    draw_indicator_badges(canvas, fonts, measurement, cell);
}

/// Hourly columns below the value: hour label, mini icon, temperature,
/// stacked top to bottom and spread evenly across the cell.
fn draw_forecast_strip(
    canvas: &mut Canvas,
    fonts: &Fonts,
    icons: &IconLibrary,
    weather: &WeatherSnapshot,
    cell: &CellSpec,
    compact: bool,
    top: i32,
) {
    let points = &weather.hourly[..weather.hourly.len().min(FORECAST_HOURS)];
    let inner_w = cell.rect.w - 2 * CELL_MARGIN;
    let col_w = inner_w / points.len() as i32;
    let px = cell.badge_font_px;
    let asc = text::ascent(&fonts.value, px).round() as i32;

    for (i, point) in points.iter().enumerate() {
        let cx = cell.rect.x + CELL_MARGIN + col_w * i as i32 + col_w / 2;

        let hour_baseline = top + asc;
        let hour = point.at.format("%H").to_string();
        text::draw(canvas, &fonts.value, px, &hour, cx, hour_baseline, Align::Center, FOREGROUND);

        let icon_top = hour_baseline + STRIP_SPACING;
        let mut icon_h = STRIP_ICON_SLOT;
        if let Some(bitmap) = icons.resolve(&point.icon, IconVariant::for_forecast(compact)) {
            icon_h = bitmap.height() as i32;
            canvas.blit(&bitmap, cx - bitmap.width() as i32 / 2, icon_top);
        }

        let temp_baseline = icon_top + icon_h + STRIP_SPACING + asc;
        let temp = format!("{:.1}{DEGREE}", point.temp);
        text::draw(canvas, &fonts.value, px, &temp, cx, temp_baseline, Align::Center, FOREGROUND);
    }
}

/// Zero-padded local hour:minute in the bottom-right corner, framed by an
/// L-shaped rule against the canvas edge.
fn draw_update_stamp(canvas: &mut Canvas, fonts: &Fonts, px: f32, now: DateTime<Local>) {
    let stamp = now.format("%H:%M").to_string();
    let w = canvas.width() as i32;
    let h = canvas.height() as i32;

    let baseline = h - STAMP_MARGIN;
    text::draw(canvas, &fonts.value, px, &stamp, w - STAMP_MARGIN, baseline, Align::Right, FOREGROUND);

    let text_w = text::measure(&fonts.value, px, &stamp);
    let frame_x = w - text_w - 2 * STAMP_MARGIN;
    let frame_y = baseline - px.round() as i32 - STAMP_MARGIN / 2;
    canvas.rule_h(frame_x, w - 1, frame_y, FOREGROUND);
    canvas.rule_v(frame_x, frame_y, h - 1, FOREGROUND);
}

/// Copy the working canvas centered into the output-sized buffer. With no
/// inset the working canvas already is the output.
fn finish_frame(canvas: Canvas, config: &CanvasConfig) -> RgbaImage {
    let work = canvas.into_image();
    if work.dimensions() == (config.width, config.height) {
        return work;
    }
    let (r, g, b) = BACKGROUND.as_tuple();
    let mut out = RgbaImage::from_pixel(config.width, config.height, Rgba([r, g, b, 0xff]));
    imageops::replace(&mut out, &work, config.inset as i64, config.inset as i64);
    out
}
