//! Graphics backend abstraction - Kitty protocol or Unicode half blocks
//!
//! Both backends take a packed RGB8 buffer and a destination cell rectangle.
//! Kitty lets the terminal scale the pixels into the cells; half blocks
//! sample two pixels per cell (top and bottom) with truecolor escapes.

mod blocks;
mod kitty;

use anyhow::Result;
use std::io::Write;

pub use kitty::rgb_to_png;

/// Graphics rendering backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsBackend {
    /// Kitty graphics protocol
    Kitty,
    /// Unicode half-block characters (universal fallback)
    Blocks,
}

impl GraphicsBackend {
    /// Detect the best available graphics backend
    pub fn detect() -> Self {
        if Self::has_kitty() {
            GraphicsBackend::Kitty
        } else {
            GraphicsBackend::Blocks
        }
    }

    fn has_kitty() -> bool {
        std::env::var("KITTY_WINDOW_ID").is_ok()
            || std::env::var("TERM").unwrap_or_default().contains("kitty")
            || std::env::var("TERM_PROGRAM").unwrap_or_default() == "WezTerm"
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            GraphicsBackend::Kitty => "Kitty Graphics",
            GraphicsBackend::Blocks => "Unicode Blocks",
        }
    }
}

/// Default capacity for line buffer in block rendering
const LINE_BUFFER_CAPACITY: usize = 512;

/// Image id used for every Kitty placement; a new frame replaces the old one
const KITTY_IMAGE_ID: u32 = 1;

/// Where an image lands on screen, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub col: u16,
    pub row: u16,
    pub width_cells: u16,
    pub height_cells: u16,
}

/// Image renderer for the selected backend
pub struct ImageRenderer {
    backend: GraphicsBackend,
    in_tmux: bool,
    /// Pre-allocated buffer for building lines of escape sequences
    line_buffer: String,
    /// Whether a Kitty image is currently placed
    kitty_placed: bool,
}

impl ImageRenderer {
    pub fn new(backend: GraphicsBackend, in_tmux: bool) -> Self {
        ImageRenderer {
            backend,
            in_tmux,
            line_buffer: String::with_capacity(LINE_BUFFER_CAPACITY),
            kitty_placed: false,
        }
    }

    /// Get the current backend
    pub fn backend(&self) -> GraphicsBackend {
        self.backend
    }

    /// Delete any placed images
    pub fn delete_all_images<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        if self.backend != GraphicsBackend::Kitty || !self.kitty_placed {
            return Ok(());
        }
        let cmd = format!("\x1b_Ga=d,d=I,i={},q=2\x1b\\", KITTY_IMAGE_ID);
        self.write_escape(writer, &cmd)?;
        self.kitty_placed = false;
        Ok(())
    }

    /// Render packed RGB8 pixels into the given cells
    pub fn render_image<W: Write>(
        &mut self,
        writer: &mut W,
        rgb: &[u8],
        width: u32,
        height: u32,
        placement: Placement,
    ) -> Result<()> {
        if width == 0 || height == 0 || placement.width_cells == 0 || placement.height_cells == 0
        {
            return Ok(());
        }
        match self.backend {
            GraphicsBackend::Kitty => self.render_kitty(writer, rgb, width, height, placement),
            GraphicsBackend::Blocks => self.render_blocks(writer, rgb, width, height, placement),
        }
    }

    /// Write an escape sequence, wrapping it for tmux passthrough when needed
    fn write_escape<W: Write>(&self, writer: &mut W, seq: &str) -> Result<()> {
        if self.in_tmux {
            let escaped = seq.replace('\x1b', "\x1b\x1b");
            write!(writer, "\x1bPtmux;{}\x1b\\", escaped)?;
        } else {
            writer.write_all(seq.as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        assert_eq!(GraphicsBackend::Kitty.name(), "Kitty Graphics");
        assert_eq!(GraphicsBackend::Blocks.name(), "Unicode Blocks");
    }

    #[test]
    fn test_empty_placement_writes_nothing() {
        let mut renderer = ImageRenderer::new(GraphicsBackend::Blocks, false);
        let mut out = Vec::new();
        let placement = Placement {
            col: 0,
            row: 0,
            width_cells: 0,
            height_cells: 4,
        };
        renderer
            .render_image(&mut out, &[0; 12], 2, 2, placement)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_tmux_passthrough_doubles_escapes() {
        let mut renderer = ImageRenderer::new(GraphicsBackend::Kitty, true);
        renderer.kitty_placed = true;
        let mut out = Vec::new();
        renderer.delete_all_images(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1bPtmux;\x1b\x1b_G"));
        assert!(!renderer.kitty_placed);
    }
}
