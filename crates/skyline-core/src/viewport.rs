//! Viewport bounds in scene pixels.

/// Size of the drawable area, in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Build a viewport from a terminal size and the pixel size of one cell.
    pub fn from_cells(columns: u16, rows: u16, cell_width_px: u16, cell_height_px: u16) -> Self {
        Self {
            width: f64::from(columns) * f64::from(cell_width_px),
            height: f64::from(rows) * f64::from(cell_height_px),
        }
    }

    /// A viewport is usable once it has a finite, positive area.
    ///
    /// Terminals report 0x0 before the first layout; such sizes never
    /// reach the entity generators.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
