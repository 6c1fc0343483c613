//! Terminal abstraction - geometry and cell/pixel conversion

use crate::layout::{LayoutSize, Rect};
use anyhow::{Context, Result};

/// Fallback cell size when the terminal does not report its pixel size
const DEFAULT_CHAR_WIDTH: u16 = 10;
const DEFAULT_CHAR_HEIGHT: u16 = 20;

/// Terminal geometry and sizing information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalGeometry {
    /// Terminal width in columns (characters)
    pub cols: u16,
    /// Terminal height in rows (lines)
    pub rows: u16,
    /// Character cell width in pixels
    pub char_width: u16,
    /// Character cell height in pixels
    pub char_height: u16,
}

impl TerminalGeometry {
    /// Get current terminal geometry
    ///
    /// Cell pixel size is derived from the window size the terminal reports
    /// (TIOCGWINSZ). Terminals that report zero pixels get a 10x20 estimate.
    pub fn detect() -> Result<Self> {
        let (cols, rows) = crossterm::terminal::size().context("Failed to get terminal size")?;

        let (char_width, char_height) = match crossterm::terminal::window_size() {
            Ok(ws) if ws.width > 0 && ws.height > 0 && cols > 0 && rows > 0 => {
                ((ws.width / cols).max(1), (ws.height / rows).max(1))
            }
            _ => (DEFAULT_CHAR_WIDTH, DEFAULT_CHAR_HEIGHT),
        };

        Ok(TerminalGeometry {
            cols,
            rows,
            char_width,
            char_height,
        })
    }

    /// Get geometry with an explicit cell size
    pub fn with_char_size(cols: u16, rows: u16, char_width: u16, char_height: u16) -> Self {
        TerminalGeometry {
            cols,
            rows,
            char_width,
            char_height,
        }
    }

    /// Whole-window size in pixels
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        (
            self.cols as u32 * self.char_width as u32,
            self.rows as u32 * self.char_height as u32,
        )
    }

    /// Pixel size of a cell rectangle
    pub fn layout_size(&self, bounds: Rect) -> LayoutSize {
        LayoutSize::new(
            bounds.width as u32 * self.char_width as u32,
            bounds.height as u32 * self.char_height as u32,
        )
    }

    /// Convert a pixel offset to a cell offset, rounding down
    pub fn pixels_to_cells(&self, x: f32, y: f32) -> (u16, u16) {
        let cw = self.char_width.max(1) as f32;
        let ch = self.char_height.max(1) as f32;
        ((x / cw).max(0.0) as u16, (y / ch).max(0.0) as u16)
    }

    /// Pixel position of the center of a cell, relative to `bounds`
    pub fn cell_center_in(&self, bounds: Rect, col: u16, row: u16) -> (f32, f32) {
        let dx = col.saturating_sub(bounds.x) as f32 + 0.5;
        let dy = row.saturating_sub(bounds.y) as f32 + 0.5;
        (dx * self.char_width as f32, dy * self.char_height as f32)
    }
}

impl Default for TerminalGeometry {
    fn default() -> Self {
        TerminalGeometry::with_char_size(80, 24, DEFAULT_CHAR_WIDTH, DEFAULT_CHAR_HEIGHT)
    }
}

/// Complete terminal context: geometry plus environment facts
#[derive(Debug, Clone)]
pub struct TerminalContext {
    pub geometry: TerminalGeometry,
    /// Inside tmux/screen
    pub in_multiplexer: bool,
}

impl TerminalContext {
    /// Create a new terminal context by detecting current environment
    pub fn detect() -> Result<Self> {
        Ok(TerminalContext {
            geometry: TerminalGeometry::detect()?,
            in_multiplexer: std::env::var("TMUX").is_ok(),
        })
    }

    /// Context for a fixed geometry, without touching the real terminal
    pub fn fixed(geometry: TerminalGeometry) -> Self {
        TerminalContext {
            geometry,
            in_multiplexer: false,
        }
    }

    /// Refresh geometry (e.g., after terminal resize)
    pub fn refresh_geometry(&mut self) -> Result<()> {
        self.geometry = TerminalGeometry::detect()?;
        Ok(())
    }

    /// Get character dimensions
    pub fn char_dimensions(&self) -> (u16, u16) {
        (self.geometry.cols, self.geometry.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_with_char_size() {
        let geom = TerminalGeometry::with_char_size(80, 24, 10, 20);
        assert_eq!(geom.cols, 80);
        assert_eq!(geom.rows, 24);
        assert_eq!(geom.pixel_dimensions(), (800, 480));
    }

    #[test]
    fn test_layout_size_from_cells() {
        let geom = TerminalGeometry::with_char_size(80, 24, 10, 20);
        let size = geom.layout_size(Rect::new(5, 2, 25, 12));
        assert_eq!(size, LayoutSize::new(250, 240));
    }

    #[test]
    fn test_cell_center_is_relative_to_bounds() {
        let geom = TerminalGeometry::with_char_size(80, 24, 10, 20);
        let (x, y) = geom.cell_center_in(Rect::new(10, 4, 20, 10), 12, 5);
        assert_eq!((x, y), (25.0, 30.0));
        assert_eq!(geom.pixels_to_cells(25.0, 30.0), (2, 1));
    }
}
