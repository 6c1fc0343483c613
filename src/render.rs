//! Rendering backend - buffered terminal output, fills, and image blits
//!
//! All output goes through one buffered writer; call `flush()` (or
//! `end_frame()`) after a batch of operations.

use crate::graphics::{GraphicsBackend, ImageRenderer, Placement};
use crate::layout::Rect;
use crate::style::Color;
use crate::terminal::{TerminalContext, TerminalGeometry};
use anyhow::Result;
use std::io::{self, BufWriter, Write};

/// Default buffer capacity for write batching (16KB)
const WRITE_BUFFER_CAPACITY: usize = 16 * 1024;

/// Terminal renderer handling output and graphics
pub struct Renderer {
    /// Buffered writer for batching terminal output
    writer: BufWriter<Box<dyn Write>>,
    context: TerminalContext,
    image_renderer: ImageRenderer,
    in_alt_screen: bool,
}

impl Renderer {
    /// Create a renderer on stdout with detected terminal context and graphics backend
    pub fn new() -> Result<Self> {
        Self::with_backend(GraphicsBackend::detect())
    }

    /// Create a renderer on stdout with a specific graphics backend
    pub fn with_backend(backend: GraphicsBackend) -> Result<Self> {
        let context = TerminalContext::detect()?;
        tracing::debug!(backend = backend.name(), "graphics backend selected");
        Ok(Self::with_writer(Box::new(io::stdout()), context, backend))
    }

    /// Create a renderer over any writer
    pub fn with_writer(
        writer: Box<dyn Write>,
        context: TerminalContext,
        backend: GraphicsBackend,
    ) -> Self {
        let in_tmux = context.in_multiplexer;
        Renderer {
            writer: BufWriter::with_capacity(WRITE_BUFFER_CAPACITY, writer),
            context,
            image_renderer: ImageRenderer::new(backend, in_tmux),
            in_alt_screen: false,
        }
    }

    /// Renderer that discards output, with a default 80x24 geometry
    pub fn headless() -> Self {
        Self::with_writer(
            Box::new(io::sink()),
            TerminalContext::fixed(TerminalGeometry::default()),
            GraphicsBackend::Blocks,
        )
    }

    /// Get the current graphics backend
    pub fn graphics_backend(&self) -> GraphicsBackend {
        self.image_renderer.backend()
    }

    /// Enter alternative screen buffer (flushes immediately)
    pub fn enter_alt_screen(&mut self) -> Result<()> {
        if !self.in_alt_screen {
            write!(self.writer, "\x1b[?1049h")?;
            self.writer.flush()?;
            self.in_alt_screen = true;
        }
        Ok(())
    }

    /// Exit alternative screen buffer (flushes immediately)
    pub fn exit_alt_screen(&mut self) -> Result<()> {
        if self.in_alt_screen {
            write!(self.writer, "\x1b[?1049l")?;
            self.writer.flush()?;
            self.in_alt_screen = false;
        }
        Ok(())
    }

    /// Clear the screen
    pub fn clear(&mut self) -> Result<()> {
        write!(self.writer, "\x1b[2J")?;
        Ok(())
    }

    /// Move cursor to position (0-indexed)
    #[inline]
    pub fn move_cursor(&mut self, col: u16, row: u16) -> Result<()> {
        write!(self.writer, "\x1b[{};{}H", row + 1, col + 1)?;
        Ok(())
    }

    pub fn hide_cursor(&mut self) -> Result<()> {
        write!(self.writer, "\x1b[?25l")?;
        Ok(())
    }

    pub fn show_cursor(&mut self) -> Result<()> {
        write!(self.writer, "\x1b[?25h")?;
        Ok(())
    }

    /// Write text at current cursor position
    #[inline]
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        write!(self.writer, "{}", text)?;
        Ok(())
    }

    /// Write text with ANSI color/style codes, resetting afterwards
    #[inline]
    pub fn write_styled(&mut self, text: &str, style: &str) -> Result<()> {
        write!(self.writer, "{}{}\x1b[0m", style, text)?;
        Ok(())
    }

    /// Paint a rectangle with a background color
    pub fn fill_rect(&mut self, bounds: Rect, color: Color) -> Result<()> {
        if bounds.is_empty() {
            return Ok(());
        }
        let blank = " ".repeat(bounds.width as usize);
        let bg = color.ansi_background();
        for row in bounds.y..bounds.bottom() {
            self.move_cursor(bounds.x, row)?;
            write!(self.writer, "{}{}\x1b[0m", bg, blank)?;
        }
        Ok(())
    }

    /// Render packed RGB8 pixels into a cell rectangle
    pub fn render_image(&mut self, rgb: &[u8], width: u32, height: u32, dest: Rect) -> Result<()> {
        let placement = Placement {
            col: dest.x,
            row: dest.y,
            width_cells: dest.width,
            height_cells: dest.height,
        };
        self.image_renderer
            .render_image(&mut self.writer, rgb, width, height, placement)
    }

    /// Delete all placed graphics
    pub fn clear_images(&mut self) -> Result<()> {
        self.image_renderer.delete_all_images(&mut self.writer)
    }

    /// Flush output buffer to terminal
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Get current terminal context
    pub fn context(&self) -> &TerminalContext {
        &self.context
    }

    /// Terminal geometry shortcut
    pub fn geometry(&self) -> TerminalGeometry {
        self.context.geometry
    }

    /// Refresh terminal geometry (call after resize)
    pub fn refresh_geometry(&mut self) -> Result<()> {
        self.context.refresh_geometry()
    }

    /// Begin a render frame: hide cursor and drop the previous frame's images
    pub fn begin_frame(&mut self) -> Result<()> {
        self.hide_cursor()?;
        self.clear_images()
    }

    /// End a render frame: flush all buffered output
    pub fn end_frame(&mut self) -> Result<()> {
        self.flush()
    }

    pub fn in_alt_screen(&self) -> bool {
        self.in_alt_screen
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // Restore terminal state even during panics
        let _ = self.exit_alt_screen();
        let _ = self.show_cursor();
        let _ = self.writer.flush();
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::Capture;
    use super::*;

    fn capturing() -> (Renderer, Capture) {
        let capture = Capture::default();
        let renderer = Renderer::with_writer(
            Box::new(capture.clone()),
            TerminalContext::fixed(TerminalGeometry::default()),
            GraphicsBackend::Blocks,
        );
        (renderer, capture)
    }

    #[test]
    fn test_headless_renderer_accepts_output() {
        let mut renderer = Renderer::headless();
        renderer.write_text("hello").unwrap();
        renderer.flush().unwrap();
        assert_eq!(renderer.graphics_backend(), GraphicsBackend::Blocks);
    }

    #[test]
    fn test_fill_rect_paints_every_row() {
        let (mut renderer, capture) = capturing();
        renderer
            .fill_rect(Rect::new(2, 1, 3, 2), Color::rgb(1, 2, 3))
            .unwrap();
        renderer.flush().unwrap();
        let text = capture.text();
        assert!(text.contains("\x1b[2;3H\x1b[48;2;1;2;3m   \x1b[0m"));
        assert!(text.contains("\x1b[3;3H"));
    }

    #[test]
    fn test_alt_screen_round_trip() {
        let (mut renderer, capture) = capturing();
        renderer.enter_alt_screen().unwrap();
        assert!(renderer.in_alt_screen());
        renderer.exit_alt_screen().unwrap();
        assert!(!renderer.in_alt_screen());
        assert_eq!(capture.text(), "\x1b[?1049h\x1b[?1049l");
    }
}
