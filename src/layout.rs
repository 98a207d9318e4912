use crate::config::CanvasConfig;
use crate::error::RenderError;

/// Integer pixel rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }
}

/// Shape of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// One measurement, full column width.
    Normal,
    /// Tall cell hosting the weather section alongside its measurement.
    Double,
    /// Two of these share a row side by side, at a reduced value font.
    Half,
}

/// One entry of the declarative cell template.
#[derive(Debug, Clone, Copy)]
pub struct CellDescriptor {
    pub kind: CellKind,
    /// Share of the column height this cell occupies.
    pub rel_height: f32,
}

/// The fixed dashboard template, consumed column-major: left column fills
/// top to bottom, then the right column. Relative heights must sum to 1.0
/// per column; the two trailing Half cells share one row.
pub const DASHBOARD_TEMPLATE: &[CellDescriptor] = &[
    CellDescriptor { kind: CellKind::Double, rel_height: 2.0 / 3.0 },
    CellDescriptor { kind: CellKind::Normal, rel_height: 1.0 / 3.0 },
    CellDescriptor { kind: CellKind::Normal, rel_height: 1.0 / 3.0 },
    CellDescriptor { kind: CellKind::Normal, rel_height: 1.0 / 3.0 },
    CellDescriptor { kind: CellKind::Half, rel_height: 1.0 / 3.0 },
    CellDescriptor { kind: CellKind::Half, rel_height: 1.0 / 3.0 },
];

/// Half cells render their value at this share of the large font.
const HALF_VALUE_FONT_FACTOR: f32 = 2.0 / 3.0;

/// Cell geometry plus the font heights derived for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSpec {
    pub kind: CellKind,
    pub rect: Rect,
    pub value_font_px: f32,
    pub label_font_px: f32,
    pub badge_font_px: f32,
}

/// One-pixel separator ruling, endpoints inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// The computed grid: cell specs in slot order (pairing with the ordered
/// measurement list by index) plus the separator rulings to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub cells: Vec<CellSpec>,
    pub separators: Vec<Line>,
}

/// Partition the working canvas into the template's cells.
///
/// The measurement count is a precondition: it must equal the template
/// length, otherwise the input is rejected before any drawing happens.
pub fn layout(measurement_count: usize, config: &CanvasConfig) -> Result<Layout, RenderError> {
    if measurement_count != DASHBOARD_TEMPLATE.len() {
        return Err(RenderError::Layout {
            expected: DASHBOARD_TEMPLATE.len(),
            got: measurement_count,
        });
    }

    let w = config.work_width() as i32;
    let h = config.work_height() as i32;
    let col_bounds = [0, w / 2, w];

    let mut cells = Vec::with_capacity(DASHBOARD_TEMPLATE.len());
    let mut separators = Vec::new();

    // Vertical centerline across the full height.
    separators.push(Line { x0: w / 2, y0: 0, x1: w / 2, y1: h - 1 });

    let mut col = 0usize;
    let mut y = 0i32;
    let mut acc = 0.0f32;
    // Set while the left half of a shared row has been placed and the right
    // half is still pending; holds that row's vertical extent.
    let mut open_half_row: Option<(i32, i32)> = None;

    for desc in DASHBOARD_TEMPLATE {
        let col_x = col_bounds[col];
        let col_w = col_bounds[col + 1] - col_bounds[col];

        let (row_top, row_bottom) = match open_half_row {
            Some(row) => row,
            None => {
                let next = acc + desc.rel_height;
                // Accumulated fractions must close the column exactly.
                let bottom = if next >= 0.999 {
                    h
                } else {
                    (h as f32 * next).round() as i32
                };
                (y, bottom)
            }
        };

        let rect = match (desc.kind, open_half_row) {
            (CellKind::Half, None) => {
                // Left half of a shared row; the row advances once its
                // partner is placed.
                open_half_row = Some((row_top, row_bottom));
                Rect::new(col_x, row_top, col_w / 2, row_bottom - row_top)
            }
            (CellKind::Half, Some(_)) => {
                let split = col_x + col_w / 2;
                separators.push(Line {
                    x0: split,
                    y0: row_top,
                    x1: split,
                    y1: row_bottom - 1,
                });
                open_half_row = None;
                Rect::new(split, row_top, col_x + col_w - split, row_bottom - row_top)
            }
            _ => Rect::new(col_x, row_top, col_w, row_bottom - row_top),
        };

        let value_font_px = match desc.kind {
            CellKind::Half => config.font_large * HALF_VALUE_FONT_FACTOR,
            _ => config.font_large,
        };
        cells.push(CellSpec {
            kind: desc.kind,
            rect,
            value_font_px,
            label_font_px: config.font_medium,
            badge_font_px: config.font_small,
        });

        if open_half_row.is_none() {
            // Row complete: horizontal divider at every interior boundary.
            if row_bottom < h {
                separators.push(Line {
                    x0: col_x,
                    y0: row_bottom,
                    x1: col_x + col_w - 1,
                    y1: row_bottom,
                });
            }
            y = row_bottom;
            acc += desc.rel_height;
            if y >= h {
                col += 1;
                y = 0;
                acc = 0.0;
            }
        }
    }

    Ok(Layout { cells, separators })
}
