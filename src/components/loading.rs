//! Spinner placeholder shown while media loads

use crate::component::Component;
use crate::context::RenderContext;
use crate::event::EventHandler;
use crate::layout::Rect;
use crate::render::Renderer;
use anyhow::Result;

const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Centered spinner with an optional label
pub struct LoadingIndicator {
    label: String,
    frame: usize,
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingIndicator {
    pub fn new() -> Self {
        LoadingIndicator {
            label: "Loading".to_string(),
            frame: 0,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Text drawn for the current frame
    pub fn line(&self) -> String {
        let spinner = FRAMES[self.frame % FRAMES.len()];
        if self.label.is_empty() {
            spinner.to_string()
        } else {
            format!("{} {}", spinner, self.label)
        }
    }
}

impl EventHandler for LoadingIndicator {}

impl Component for LoadingIndicator {
    fn render(&mut self, renderer: &mut Renderer, bounds: Rect, ctx: &RenderContext) -> Result<()> {
        if bounds.is_empty() {
            return Ok(());
        }
        if let Some(bg) = ctx.style.background {
            renderer.fill_rect(bounds, bg)?;
        }

        let line = self.line();
        let width = line.chars().count() as u16;
        let x = bounds.x + bounds.width.saturating_sub(width) / 2;
        let y = bounds.y + bounds.height / 2;
        renderer.move_cursor(x, y)?;
        renderer.write_styled(&line, &ctx.style.text_sgr())?;

        self.frame = self.frame.wrapping_add(1);
        Ok(())
    }

    fn min_size(&self) -> (u16, u16) {
        (self.line().chars().count() as u16, 1)
    }

    fn name(&self) -> &str {
        "LoadingIndicator"
    }
}
