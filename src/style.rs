//! Visual style shared by the media area and its placeholder

use crate::layout::Rect;

/// Terminal color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// True color RGB
    Rgb(u8, u8, u8),
    /// 256-color palette index
    Palette256(u8),
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(r, g, b)
    }

    pub fn black() -> Self {
        Color::Rgb(0, 0, 0)
    }

    pub fn dark_gray() -> Self {
        Color::Rgb(128, 128, 128)
    }

    /// SGR sequence selecting this color as background
    pub fn ansi_background(&self) -> String {
        match self {
            Color::Rgb(r, g, b) => format!("\x1b[48;2;{};{};{}m", r, g, b),
            Color::Palette256(n) => format!("\x1b[48;5;{}m", n),
        }
    }

    /// SGR sequence selecting this color as foreground
    pub fn ansi_foreground(&self) -> String {
        match self {
            Color::Rgb(r, g, b) => format!("\x1b[38;2;{};{};{}m", r, g, b),
            Color::Palette256(n) => format!("\x1b[38;5;{}m", n),
        }
    }
}

/// Box style: background fill, text color, and inner padding in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub padding: u16,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn padding(mut self, padding: u16) -> Self {
        self.padding = padding;
        self
    }

    /// Bounds left for content once padding is applied
    pub fn content_bounds(&self, bounds: Rect) -> Rect {
        bounds.inner(self.padding)
    }

    /// Opening SGR sequence for text drawn in this style (may be empty)
    pub fn text_sgr(&self) -> String {
        let mut sgr = String::new();
        if let Some(bg) = self.background {
            sgr.push_str(&bg.ansi_background());
        }
        if let Some(fg) = self.foreground {
            sgr.push_str(&fg.ansi_foreground());
        }
        sgr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_sequences() {
        assert_eq!(Color::rgb(1, 2, 3).ansi_background(), "\x1b[48;2;1;2;3m");
        assert_eq!(Color::Palette256(42).ansi_foreground(), "\x1b[38;5;42m");
    }

    #[test]
    fn test_style_padding_shrinks_bounds() {
        let style = Style::new().padding(1);
        assert_eq!(
            style.content_bounds(Rect::new(0, 0, 10, 6)),
            Rect::new(1, 1, 8, 4)
        );
    }

    #[test]
    fn test_text_sgr_combines_colors() {
        let style = Style::new()
            .background(Color::black())
            .foreground(Color::dark_gray());
        assert_eq!(
            style.text_sgr(),
            "\x1b[48;2;0;0;0m\x1b[38;2;128;128;128m"
        );
        assert_eq!(Style::new().text_sgr(), "");
    }
}
