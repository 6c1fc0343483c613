//! Layout - cell rectangles and the on-screen box tracker

/// Rectangle bounds in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Create rectangle from terminal dimensions (fills entire screen)
    pub fn fullscreen(cols: u16, rows: u16) -> Self {
        Rect::new(0, 0, cols, rows)
    }

    /// Get right edge x-coordinate
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Get bottom edge y-coordinate
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if point is inside rectangle
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Create a subrect with padding applied on every side
    pub fn inner(&self, padding: u16) -> Self {
        let padding2 = padding.saturating_mul(2);
        Rect {
            x: self.x.saturating_add(padding),
            y: self.y.saturating_add(padding),
            width: self.width.saturating_sub(padding2),
            height: self.height.saturating_sub(padding2),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// On-screen box size in pixels, as reported by the host layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutSize {
    pub width: u32,
    pub height: u32,
}

impl LayoutSize {
    pub fn new(width: u32, height: u32) -> Self {
        LayoutSize { width, height }
    }

    /// Both dimensions are nonzero
    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Records the most recent layout box, ignoring repeats
#[derive(Debug, Clone, Default)]
pub struct LayoutTracker {
    size: LayoutSize,
}

impl LayoutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new layout box. Returns true if either dimension changed.
    pub fn on_layout(&mut self, size: LayoutSize) -> bool {
        if self.size == size {
            return false;
        }
        self.size = size;
        true
    }

    /// Current size, or `None` until a layout with both dimensions nonzero arrives
    pub fn size(&self) -> Option<LayoutSize> {
        self.size.is_known().then_some(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(15, 15));
        assert!(r.contains(10, 10)); // edge
        assert!(!r.contains(30, 30)); // outside
        assert!(!r.contains(5, 15));
    }

    #[test]
    fn test_rect_inner_saturates() {
        let r = Rect::new(0, 0, 3, 3);
        let inner = r.inner(2);
        assert_eq!(inner, Rect::new(2, 2, 0, 0));
        assert!(inner.is_empty());
    }

    #[test]
    fn test_layout_tracker_ignores_repeats() {
        let mut tracker = LayoutTracker::new();
        assert_eq!(tracker.size(), None);

        assert!(tracker.on_layout(LayoutSize::new(800, 480)));
        assert!(!tracker.on_layout(LayoutSize::new(800, 480)));
        assert_eq!(tracker.size(), Some(LayoutSize::new(800, 480)));

        // A change in only one dimension still counts
        assert!(tracker.on_layout(LayoutSize::new(800, 400)));
        assert_eq!(tracker.size(), Some(LayoutSize::new(800, 400)));
    }

    #[test]
    fn test_layout_tracker_zero_box_is_unknown() {
        let mut tracker = LayoutTracker::new();
        assert!(tracker.on_layout(LayoutSize::new(0, 300)));
        assert_eq!(tracker.size(), None);
    }
}
