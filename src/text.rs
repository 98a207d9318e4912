use std::fs;
use std::path::{Path, PathBuf};

use rusttype::{point, Font, Scale};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::RenderError;
use crate::layout::Rect;

/// Horizontal placement of a string relative to its anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// The two faces the dashboard renders with: a medium face for labels and a
/// bold face for values, badges and the timestamp.
pub struct Fonts {
    pub label: Font<'static>,
    pub value: Font<'static>,
}

impl Fonts {
    /// Load both faces. Any failure is fatal: without a face nothing can be
    /// measured, let alone drawn.
    pub fn load(label_path: &Path, value_path: &Path) -> Result<Self, RenderError> {
        Ok(Self {
            label: load_face(label_path)?,
            value: load_face(value_path)?,
        })
    }
}

fn load_face(path: &Path) -> Result<Font<'static>, RenderError> {
    let bytes = fs::read(path).map_err(|source| RenderError::FontRead {
        path: PathBuf::from(path),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| RenderError::FontParse {
        path: PathBuf::from(path),
    })
}

/// Advance width of `text` at `px`, rounded to whole pixels.
pub fn measure(font: &Font, px: f32, text: &str) -> i32 {
    let scale = Scale::uniform(px);
    let glyphs: Vec<_> = font.layout(text, scale, point(0.0, 0.0)).collect();
    match glyphs.last() {
        Some(last) => {
            (last.position().x + last.unpositioned().h_metrics().advance_width).round() as i32
        }
        None => 0,
    }
}

/// Ascent of the face at `px`, for baseline math owned by callers.
pub fn ascent(font: &Font, px: f32) -> f32 {
    font.v_metrics(Scale::uniform(px)).ascent
}

/// Rasterize `text` with its baseline at `y`. The anchor `x` is the left
/// edge, center, or right edge of the string depending on `align`; all other
/// layout math belongs to the caller.
pub fn draw(
    canvas: &mut Canvas,
    font: &Font,
    px: f32,
    text: &str,
    x: i32,
    y: i32,
    align: Align,
    color: Color,
) {
    let width = measure(font, px, text);
    let start_x = match align {
        Align::Left => x,
        Align::Center => x - width / 2,
        Align::Right => x - width,
    };
    let scale = Scale::uniform(px);
    for glyph in font.layout(text, scale, point(start_x as f32, y as f32)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                canvas.set_pixel(bb.min.x + gx as i32, bb.min.y + gy as i32, color, v);
            });
        }
    }
}

/// Extra width a badge adds around its text.
const BADGE_PADDING: i32 = 8;

/// Measured text width at or below this renders no badge at all.
const BADGE_MIN_WIDTH: i32 = 1;

/// Badge rectangle for a measured text width, anchored by its bottom-right
/// corner. Returns None when the text is too narrow to warrant a badge,
/// which is how empty indicator strings vanish entirely.
pub fn badge_rect(text_width: i32, px: f32, anchor_x: i32, anchor_y: i32) -> Option<Rect> {
    if text_width <= BADGE_MIN_WIDTH {
        return None;
    }
    let w = text_width + BADGE_PADDING;
    let h = px.round() as i32 + 2;
    Some(Rect::new(anchor_x - w, anchor_y - h, w, h))
}

/// Paint a filled badge with inverse text on top, legible over whatever the
/// cell already contains. Returns the horizontal space consumed so the
/// caller can stack further badges leftward; zero when nothing was drawn.
pub fn draw_badge(
    canvas: &mut Canvas,
    font: &Font,
    px: f32,
    text: &str,
    anchor_x: i32,
    anchor_y: i32,
    fill: Color,
) -> i32 {
    let width = measure(font, px, text);
    let Some(rect) = badge_rect(width, px, anchor_x, anchor_y) else {
        return 0;
    };
    canvas.fill_rect(rect, fill);
    let baseline = rect.y + ((rect.h as f32 + ascent(font, px)) / 2.0).round() as i32 - 2;
    draw(
        canvas,
        font,
        px,
        text,
        rect.x + rect.w / 2,
        baseline,
        Align::Center,
        fill.inverse(),
    );
    rect.w
}
