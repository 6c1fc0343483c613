//! Kitty graphics protocol rendering backend

use super::{ImageRenderer, Placement, KITTY_IMAGE_ID};
use anyhow::Result;
use image::{ImageBuffer, Rgb};
use std::io::{Cursor, Write};

/// Max payload bytes per escape sequence chunk
const CHUNK_SIZE: usize = 4096;

impl ImageRenderer {
    /// Transmit and place an image in one go (a=T), replacing the previous one
    pub(super) fn render_kitty<W: Write>(
        &mut self,
        writer: &mut W,
        rgb: &[u8],
        width: u32,
        height: u32,
        placement: Placement,
    ) -> Result<()> {
        let png = rgb_to_png(width, height, rgb)?;
        let encoded = encode_base64(&png);

        write!(writer, "\x1b[{};{}H", placement.row + 1, placement.col + 1)?;

        let chunks: Vec<&[u8]> = encoded.as_bytes().chunks(CHUNK_SIZE).collect();
        let last = chunks.len().saturating_sub(1);
        for (i, chunk) in chunks.iter().enumerate() {
            let more = if i == last { 0 } else { 1 };
            let payload = std::str::from_utf8(chunk)?;
            let seq = if i == 0 {
                format!(
                    "\x1b_Ga=T,f=100,t=d,i={},c={},r={},C=1,q=2,m={};{}\x1b\\",
                    KITTY_IMAGE_ID, placement.width_cells, placement.height_cells, more, payload
                )
            } else {
                format!("\x1b_Gm={};{}\x1b\\", more, payload)
            };
            self.write_escape(writer, &seq)?;
        }

        self.kitty_placed = true;
        Ok(())
    }
}

/// Encode RGB8 buffer to PNG
pub fn rgb_to_png(width: u32, height: u32, data: &[u8]) -> Result<Vec<u8>> {
    let img = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, data)
        .ok_or_else(|| anyhow::anyhow!("Invalid RGB buffer dimensions"))?;

    let mut png_data = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)?;
    Ok(png_data)
}

fn encode_base64(data: &[u8]) -> String {
    let mut encoded = String::with_capacity(data.len() * 4 / 3 + 4);
    base64::Engine::encode_string(
        &base64::engine::general_purpose::STANDARD,
        data,
        &mut encoded,
    );
    encoded
}

#[cfg(test)]
mod tests {
    use super::super::GraphicsBackend;
    use super::*;

    #[test]
    fn test_rgb_to_png_magic() {
        let data = vec![255, 0, 0, 255, 0, 0, 255, 0, 0, 255, 0, 0];
        let png = rgb_to_png(2, 2, &data).unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_rgb_to_png_rejects_short_buffer() {
        assert!(rgb_to_png(4, 4, &[0; 3]).is_err());
    }

    #[test]
    fn test_kitty_placement_carries_cell_size() {
        let mut renderer = ImageRenderer::new(GraphicsBackend::Kitty, false);
        let mut out = Vec::new();
        let placement = Placement {
            col: 0,
            row: 2,
            width_cells: 12,
            height_cells: 5,
        };
        renderer
            .render_image(&mut out, &[10; 12], 2, 2, placement)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[3;1H\x1b_Ga=T,f=100"));
        assert!(text.contains("c=12,r=5"));
        assert!(text.ends_with("\x1b\\"));
    }
}
