//! Unicode half-block rendering backend (universal fallback)

use super::{ImageRenderer, Placement};
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

impl ImageRenderer {
    /// Render using half blocks, two vertical samples per cell
    ///
    /// Nearest-neighbour sampling; one write per line.
    pub(super) fn render_blocks<W: Write>(
        &mut self,
        writer: &mut W,
        rgb: &[u8],
        width: u32,
        height: u32,
        placement: Placement,
    ) -> Result<()> {
        let cols = placement.width_cells as u32;
        let rows = placement.height_cells as u32;
        let sub_rows = rows * 2;

        for cy in 0..rows {
            self.line_buffer.clear();
            let top_y = (2 * cy) * height / sub_rows;
            let bottom_y = (2 * cy + 1) * height / sub_rows;

            for cx in 0..cols {
                let x = cx * width / cols;
                let (tr, tg, tb) = sample(rgb, width, x, top_y);
                let (br, bg, bb) = sample(rgb, width, x, bottom_y);
                write!(
                    self.line_buffer,
                    "\x1b[38;2;{};{};{};48;2;{};{};{}m{}",
                    tr, tg, tb, br, bg, bb, HALF_BLOCK
                )
                .ok();
            }

            write!(
                writer,
                "\x1b[{};{}H{}\x1b[0m",
                placement.row as u32 + cy + 1,
                placement.col as u32 + 1,
                self.line_buffer
            )?;
        }

        Ok(())
    }
}

/// Read one pixel; out-of-range reads are black
fn sample(rgb: &[u8], width: u32, x: u32, y: u32) -> (u8, u8, u8) {
    let idx = (y as usize * width as usize + x as usize) * 3;
    match rgb.get(idx..idx + 3) {
        Some(px) => (px[0], px[1], px[2]),
        None => (0, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::super::GraphicsBackend;
    use super::*;

    #[test]
    fn test_half_blocks_sample_top_and_bottom() {
        // 1x2 image: red on top, blue below
        let rgb = vec![255, 0, 0, 0, 0, 255];
        let mut renderer = ImageRenderer::new(GraphicsBackend::Blocks, false);
        let mut out = Vec::new();
        let placement = Placement {
            col: 3,
            row: 1,
            width_cells: 1,
            height_cells: 1,
        };
        renderer.render_image(&mut out, &rgb, 1, 2, placement).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[2;4H"));
        assert!(text.contains("\x1b[38;2;255;0;0;48;2;0;0;255m▀"));
    }

    #[test]
    fn test_short_buffer_reads_black() {
        assert_eq!(sample(&[1, 2, 3], 1, 0, 5), (0, 0, 0));
        assert_eq!(sample(&[1, 2, 3], 1, 0, 0), (1, 2, 3));
    }
}
