use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::layout::Rect;

/// Owned RGBA frame the compositor draws into.
///
/// All drawing goes through [`Canvas::set_pixel`], which alpha-blends the
/// source color over whatever is already in the frame, so primitives and
/// glyph rasterization compose in any order.
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let (r, g, b) = background.as_tuple();
        Self {
            img: RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0xff])),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    /// Blend a single pixel at full or partial coverage. Out-of-bounds
    /// coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x >= self.img.width() as i32 || y >= self.img.height() as i32 {
            return;
        }
        let dst = self.img.get_pixel_mut(x as u32, y as u32);
        let a = alpha.clamp(0.0, 1.0);
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        *dst = Rgba([
            blend(color.r, dst.0[0]),
            blend(color.g, dst.0[1]),
            blend(color.b, dst.0[2]),
            0xff,
        ]);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        for y in rect.y..rect.y + rect.h {
            for x in rect.x..rect.x + rect.w {
                self.set_pixel(x, y, color, 1.0);
            }
        }
    }

    /// One-pixel horizontal ruling from `x0` to `x1` inclusive.
    pub fn rule_h(&mut self, x0: i32, x1: i32, y: i32, color: Color) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.set_pixel(x, y, color, 1.0);
        }
    }

    /// One-pixel vertical ruling from `y0` to `y1` inclusive.
    pub fn rule_v(&mut self, x: i32, y0: i32, y1: i32, color: Color) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.set_pixel(x, y, color, 1.0);
        }
    }

    /// Alpha-blend a bitmap with its top-left corner at (x, y).
    pub fn blit(&mut self, bitmap: &RgbaImage, x: i32, y: i32) {
        for (bx, by, px) in bitmap.enumerate_pixels() {
            let alpha = px.0[3] as f32 / 255.0;
            if alpha > 0.0 {
                self.set_pixel(
                    x + bx as i32,
                    y + by as i32,
                    Color::new(px.0[0], px.0[1], px.0[2]),
                    alpha,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BACKGROUND, FOREGROUND};

    #[test]
    fn test_new_canvas_is_background_filled() {
        let canvas = Canvas::new(4, 3, BACKGROUND);
        let img = canvas.into_image();
        assert_eq!(img.dimensions(), (4, 3));
        assert!(img.pixels().all(|p| p.0 == [0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_set_pixel_full_coverage() {
        let mut canvas = Canvas::new(2, 2, BACKGROUND);
        canvas.set_pixel(1, 0, FOREGROUND, 1.0);
        let img = canvas.into_image();
        assert_eq!(img.get_pixel(1, 0).0, [0x00, 0x00, 0x00, 0xff]);
        assert_eq!(img.get_pixel(0, 0).0, [0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_set_pixel_blends_partial_coverage() {
        let mut canvas = Canvas::new(1, 1, BACKGROUND);
        canvas.set_pixel(0, 0, FOREGROUND, 0.5);
        let img = canvas.into_image();
        assert_eq!(img.get_pixel(0, 0).0, [0x80, 0x80, 0x80, 0xff]);
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_ignored() {
        let mut canvas = Canvas::new(2, 2, BACKGROUND);
        canvas.set_pixel(-1, 0, FOREGROUND, 1.0);
        canvas.set_pixel(0, 5, FOREGROUND, 1.0);
        let img = canvas.into_image();
        assert!(img.pixels().all(|p| p.0 == [0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_rulings() {
        let mut canvas = Canvas::new(4, 4, BACKGROUND);
        canvas.rule_h(0, 3, 1, FOREGROUND);
        canvas.rule_v(2, 0, 3, FOREGROUND);
        let img = canvas.into_image();
        for x in 0..4 {
            assert_eq!(img.get_pixel(x, 1).0, [0x00, 0x00, 0x00, 0xff]);
        }
        for y in 0..4 {
            assert_eq!(img.get_pixel(2, y).0, [0x00, 0x00, 0x00, 0xff]);
        }
        assert_eq!(img.get_pixel(0, 0).0, [0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_blit_respects_source_alpha() {
        let mut canvas = Canvas::new(2, 1, BACKGROUND);
        let mut bitmap = RgbaImage::new(2, 1);
        bitmap.put_pixel(0, 0, Rgba([0x00, 0x00, 0x00, 0xff]));
        bitmap.put_pixel(1, 0, Rgba([0x00, 0x00, 0x00, 0x00]));
        canvas.blit(&bitmap, 0, 0);
        let img = canvas.into_image();
        assert_eq!(img.get_pixel(0, 0).0, [0x00, 0x00, 0x00, 0xff]);
        assert_eq!(img.get_pixel(1, 0).0, [0xff, 0xff, 0xff, 0xff]);
    }
}
