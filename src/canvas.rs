//! Fixed-size pixel surface that the games draw on.
//!
//! The terminal cannot address pixels, so the canvas keeps its logical pixel
//! size (the coordinates every simulation works in) and rasterises each draw
//! onto a grid of cells, `cell_w × cell_h` pixels each. Draws falling outside
//! the surface are clipped without error.

use crossterm::style::Color;

/// What one terminal cell shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub glyph: char,
    pub color: Color,
}

impl Paint {
    pub const fn new(glyph: char, color: Color) -> Self {
        Paint { glyph, color }
    }

    pub const fn solid(color: Color) -> Self {
        Paint { glyph: '█', color }
    }
}

/// Pixel size of a canvas and how it maps onto terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub cell_w: u32,
    pub cell_h: u32,
    /// Terminal columns used per cell (2 keeps square cells square).
    pub chars_per_cell: u16,
}

impl Surface {
    /// 300×200 at 5×10 px per cell: 60×20 cells.
    pub const WIDE: Surface = Surface {
        width: 300,
        height: 200,
        cell_w: 5,
        cell_h: 10,
        chars_per_cell: 1,
    };

    /// 150×300 at 15×15 px per cell: the 10×20 Tetris well.
    pub const TALL: Surface = Surface {
        width: 150,
        height: 300,
        cell_w: 15,
        cell_h: 15,
        chars_per_cell: 2,
    };

    pub fn cols(&self) -> u16 {
        self.width.div_ceil(self.cell_w) as u16
    }

    pub fn rows(&self) -> u16 {
        self.height.div_ceil(self.cell_h) as u16
    }

    /// Width on screen in terminal columns.
    pub fn screen_cols(&self) -> u16 {
        self.cols() * self.chars_per_cell
    }
}

#[derive(Clone, Debug)]
pub struct Canvas {
    surface: Surface,
    cells: Vec<Option<Paint>>,
}

impl Canvas {
    pub fn new(surface: Surface) -> Self {
        let len = surface.cols() as usize * surface.rows() as usize;
        Canvas {
            surface,
            cells: vec![None; len],
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Paint every cell the pixel rectangle touches.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let s = self.surface;
        let x0 = x.max(0.0);
        let y0 = y.max(0.0);
        let x1 = (x + w).min(s.width as f32);
        let y1 = (y + h).min(s.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let c0 = (x0 / s.cell_w as f32).floor() as u16;
        let r0 = (y0 / s.cell_h as f32).floor() as u16;
        let c1 = ((x1 / s.cell_w as f32).ceil() as u16).min(s.cols());
        let r1 = ((y1 / s.cell_h as f32).ceil() as u16).min(s.rows());
        for row in r0..r1 {
            for col in c0..c1 {
                self.set(col, row, paint);
            }
        }
    }

    /// Write text starting at the cell containing the pixel `(x, y)`.
    pub fn label(&mut self, x: f32, y: f32, text: &str, color: Color) {
        let s = self.surface;
        if x < 0.0 || y < 0.0 || x >= s.width as f32 || y >= s.height as f32 {
            return;
        }
        let row = (y / s.cell_h as f32) as u16;
        let start = (x / s.cell_w as f32) as u16;
        for (i, ch) in text.chars().enumerate() {
            let col = start + i as u16;
            if col >= s.cols() {
                break;
            }
            self.set(col, row, Paint::new(ch, color));
        }
    }

    /// Write text horizontally centred on a pixel row.
    pub fn label_centered(&mut self, y: f32, text: &str, color: Color) {
        let s = self.surface;
        let len = text.chars().count() as u16;
        let col = s.cols().saturating_sub(len) / 2;
        self.label((col as u32 * s.cell_w) as f32, y, text, color);
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<Paint> {
        if col >= self.surface.cols() || row >= self.surface.rows() {
            return None;
        }
        self.cells[row as usize * self.surface.cols() as usize + col as usize]
    }

    /// The painted cells of one row, `None` for background.
    pub fn row(&self, row: u16) -> &[Option<Paint>] {
        let cols = self.surface.cols() as usize;
        let start = row as usize * cols;
        self.cells.get(start..start + cols).unwrap_or(&[])
    }

    fn set(&mut self, col: u16, row: u16, paint: Paint) {
        let idx = row as usize * self.surface.cols() as usize + col as usize;
        if let Some(cell) = self.cells.get_mut(idx) {
            *cell = Some(paint);
        }
    }
}
