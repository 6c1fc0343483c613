//! Rendering context - terminal geometry and inherited style for components

use crate::style::Style;
use crate::terminal::TerminalGeometry;

/// Context passed down the component tree during rendering
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Cell grid and cell pixel size, for cell/pixel conversions
    pub geometry: &'a TerminalGeometry,

    /// Style inherited from the parent
    pub style: &'a Style,
}

impl<'a> RenderContext<'a> {
    pub fn new(geometry: &'a TerminalGeometry, style: &'a Style) -> Self {
        RenderContext { geometry, style }
    }

    /// Create a child context with a different style
    pub fn with_style(&self, style: &'a Style) -> Self {
        RenderContext {
            geometry: self.geometry,
            style,
        }
    }
}
