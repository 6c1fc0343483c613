//! Zoom limit and aspect ratio derived from natural and on-screen size

use crate::layout::LayoutSize;
use crate::media::NaturalSize;

/// Parameters handed to the view transformer each render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    /// Upper zoom bound, never below 1
    pub max_scale: f32,
    /// Natural width / height, when the natural size is known
    pub content_aspect_ratio: Option<f32>,
}

impl Default for TransformParams {
    fn default() -> Self {
        TransformParams {
            max_scale: 1.0,
            content_aspect_ratio: None,
        }
    }
}

impl TransformParams {
    /// Zoom may go as far as 1:1 native pixels in whichever dimension needs
    /// more magnification. Shrinking below fit is never limited, so the
    /// bound is floored at 1.
    pub fn compute(natural: Option<NaturalSize>, layout: Option<LayoutSize>) -> Self {
        let Some(natural) = natural.filter(NaturalSize::is_valid) else {
            return Self::default();
        };

        let width = natural.width as f32;
        let height = natural.height as f32;
        let content_aspect_ratio = Some(width / height);

        let max_scale = match layout.filter(LayoutSize::is_known) {
            Some(layout) => {
                let by_width = width / layout.width as f32;
                let by_height = height / layout.height as f32;
                by_width.max(by_height).max(1.0)
            }
            None => 1.0,
        };

        TransformParams {
            max_scale,
            content_aspect_ratio,
        }
    }
}
