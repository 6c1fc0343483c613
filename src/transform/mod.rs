//! Pan/zoom viewport
//!
//! [`ViewTransformer`] owns the scale and translation of content fitted
//! ("contain") inside a view, turns mouse and key input into transform
//! changes, and projects the result onto the visible part of the content.
//!
//! Coordinates are view pixels with the origin at the top-left of the view.
//! Translation is measured from the centered position.

mod params;
mod props;

pub use params::TransformParams;
pub use props::{
    forward, PropKey, TapCallback, TransformCallback, TransformerProps, FORWARDED_PROPS,
    FORWARDED_PROPS_VERSION,
};

use crate::event::{Event, EventHandler, Key, MouseButton, MouseEvent};
use crate::layout::{LayoutSize, Rect};
use crate::terminal::TerminalGeometry;
use std::time::{Duration, Instant};

/// Two taps closer than this form a double tap
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);

const DEFAULT_MAX_OVERSCROLL: f32 = 20.0;
const WHEEL_ZOOM_STEP: f32 = 1.25;
const KEY_ZOOM_STEP: f32 = 1.2;
/// Key pan step as a fraction of the view
const KEY_PAN_FRACTION: f32 = 0.1;
/// Drag speed while overscrolling
const RESISTANCE: f32 = 0.5;
const DOUBLE_TAP_SCALE: f32 = 2.0;

/// Current scale and translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        TransformState {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

/// Visible part of the content
///
/// `u`/`v` are fractions of the content (0..1); `dest_*` is where that part
/// lands in the view, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
    pub dest_x: f32,
    pub dest_y: f32,
    pub dest_w: f32,
    pub dest_h: f32,
}

/// Resolved configuration
#[derive(Clone)]
struct Config {
    enable_transform: bool,
    enable_scale: bool,
    enable_translate: bool,
    enable_resistance: bool,
    max_scale: f32,
    content_aspect_ratio: Option<f32>,
    max_overscroll_distance: f32,
    on_single_tap_confirmed: Option<TapCallback>,
    on_transform_gesture_released: Option<TransformCallback>,
    on_view_transformed: Option<TransformCallback>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            enable_transform: true,
            enable_scale: true,
            enable_translate: true,
            enable_resistance: false,
            max_scale: 1.0,
            content_aspect_ratio: None,
            max_overscroll_distance: DEFAULT_MAX_OVERSCROLL,
            on_single_tap_confirmed: None,
            on_transform_gesture_released: None,
            on_view_transformed: None,
        }
    }
}

impl From<&TransformerProps> for Config {
    fn from(props: &TransformerProps) -> Self {
        let d = Config::default();
        Config {
            enable_transform: props.enable_transform.unwrap_or(d.enable_transform),
            enable_scale: props.enable_scale.unwrap_or(d.enable_scale),
            enable_translate: props.enable_translate.unwrap_or(d.enable_translate),
            enable_resistance: props.enable_resistance.unwrap_or(d.enable_resistance),
            max_scale: props
                .max_scale
                .filter(|s| s.is_finite())
                .unwrap_or(d.max_scale)
                .max(1.0),
            content_aspect_ratio: props
                .content_aspect_ratio
                .filter(|r| r.is_finite() && *r > 0.0),
            max_overscroll_distance: props
                .max_overscroll_distance
                .unwrap_or(d.max_overscroll_distance)
                .max(0.0),
            on_single_tap_confirmed: props.on_single_tap_confirmed.clone(),
            on_transform_gesture_released: props.on_transform_gesture_released.clone(),
            on_view_transformed: props.on_view_transformed.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    last: (f32, f32),
    moved: bool,
}

/// Pan/zoom state machine for one piece of content
///
/// A fresh instance starts at scale 1, centered. Owners that switch to
/// unrelated content should replace the instance rather than reuse it.
pub struct ViewTransformer {
    config: Config,
    state: TransformState,
    view: LayoutSize,
    bounds: Rect,
    geometry: TerminalGeometry,
    drag: Option<Drag>,
    pending_tap: Option<(Instant, (f32, f32))>,
}

impl Default for ViewTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTransformer {
    pub fn new() -> Self {
        ViewTransformer {
            config: Config::default(),
            state: TransformState::default(),
            view: LayoutSize::default(),
            bounds: Rect::default(),
            geometry: TerminalGeometry::default(),
            drag: None,
            pending_tap: None,
        }
    }

    /// Apply configuration; the current transform is pulled back into range
    pub fn configure(&mut self, props: &TransformerProps) {
        self.config = Config::from(props);
        if !self.config.enable_transform {
            self.drag = None;
            self.pending_tap = None;
        }
        self.clamp_and_notify();
    }

    /// Set the on-screen box for this frame
    pub fn set_viewport(&mut self, bounds: Rect, geometry: TerminalGeometry) {
        self.bounds = bounds;
        self.geometry = geometry;
        let view = geometry.layout_size(bounds);
        if view != self.view {
            self.view = view;
            self.clamp_and_notify();
        }
    }

    pub fn transform(&self) -> TransformState {
        self.state
    }

    pub fn max_scale(&self) -> f32 {
        self.config.max_scale
    }

    pub fn content_aspect_ratio(&self) -> Option<f32> {
        self.config.content_aspect_ratio
    }

    /// Whether gestures are accepted
    pub fn is_enabled(&self) -> bool {
        self.config.enable_transform
    }

    pub fn is_scale_enabled(&self) -> bool {
        self.config.enable_scale
    }

    pub fn is_translate_enabled(&self) -> bool {
        self.config.enable_translate
    }

    pub fn view_size(&self) -> LayoutSize {
        self.view
    }

    /// Back to scale 1, centered
    pub fn reset(&mut self) {
        self.set_state(TransformState::default());
    }

    /// Zoom to `scale` (clamped to 1..=max_scale) about a view point, or the center
    pub fn zoom_to(&mut self, scale: f32, pivot: Option<(f32, f32)>) {
        let target = scale.clamp(1.0, self.config.max_scale);
        let old = self.state.scale;
        let (vw, vh) = (self.view.width as f32, self.view.height as f32);
        let (px, py) = pivot.unwrap_or((vw / 2.0, vh / 2.0));

        // Keep the content point under the pivot fixed
        let ratio = target / old;
        let cx = vw / 2.0 + self.state.translate_x;
        let cy = vh / 2.0 + self.state.translate_y;
        let new_cx = px - (px - cx) * ratio;
        let new_cy = py - (py - cy) * ratio;

        let (max_x, max_y) = self.translate_limits(target);
        self.set_state(TransformState {
            scale: target,
            translate_x: (new_cx - vw / 2.0).clamp(-max_x, max_x),
            translate_y: (new_cy - vh / 2.0).clamp(-max_y, max_y),
        });
    }

    pub fn zoom_by(&mut self, factor: f32, pivot: Option<(f32, f32)>) {
        self.zoom_to(self.state.scale * factor, pivot);
    }

    /// Pan by a pixel delta, kept within the content bounds
    pub fn translate_by(&mut self, dx: f32, dy: f32) {
        let (max_x, max_y) = self.translate_limits(self.state.scale);
        self.set_state(TransformState {
            scale: self.state.scale,
            translate_x: (self.state.translate_x + dx).clamp(-max_x, max_x),
            translate_y: (self.state.translate_y + dy).clamp(-max_y, max_y),
        });
    }

    /// Content size at scale 1, fitted inside the view
    pub fn fitted_content_size(&self) -> (f32, f32) {
        let (vw, vh) = (self.view.width as f32, self.view.height as f32);
        match self.config.content_aspect_ratio {
            Some(ratio) if vh > 0.0 && vw / vh > ratio => (vh * ratio, vh),
            Some(ratio) => (vw, vw / ratio),
            None => (vw, vh),
        }
    }

    /// Map the current transform onto the visible part of the content
    pub fn project(&self) -> Option<Projection> {
        if !self.view.is_known() {
            return None;
        }
        let (vw, vh) = (self.view.width as f32, self.view.height as f32);
        let (fw, fh) = self.fitted_content_size();
        let cw = fw * self.state.scale;
        let ch = fh * self.state.scale;
        if cw <= 0.0 || ch <= 0.0 {
            return None;
        }

        let x0 = (vw - cw) / 2.0 + self.state.translate_x;
        let y0 = (vh - ch) / 2.0 + self.state.translate_y;
        let dx0 = x0.max(0.0);
        let dy0 = y0.max(0.0);
        let dx1 = (x0 + cw).min(vw);
        let dy1 = (y0 + ch).min(vh);
        if dx1 <= dx0 || dy1 <= dy0 {
            return None;
        }

        Some(Projection {
            u0: (dx0 - x0) / cw,
            v0: (dy0 - y0) / ch,
            u1: (dx1 - x0) / cw,
            v1: (dy1 - y0) / ch,
            dest_x: dx0,
            dest_y: dy0,
            dest_w: dx1 - dx0,
            dest_h: dy1 - dy0,
        })
    }

    /// Handle an input event received at `now`. Returns true if consumed.
    pub fn handle_event_at(&mut self, event: &Event, now: Instant) -> bool {
        if !self.config.enable_transform {
            return false;
        }
        match event {
            Event::Mouse(mouse) => self.handle_mouse(*mouse, now),
            Event::Key(key) => self.handle_key(*key),
            _ => false,
        }
    }

    /// Confirm a pending single tap once the double-tap window has passed
    ///
    /// Returns true if a tap was confirmed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some((at, point)) = self.pending_tap else {
            return false;
        };
        if now.duration_since(at) < DOUBLE_TAP_WINDOW {
            return false;
        }
        self.pending_tap = None;
        crate::trace_debug!(x = point.0, y = point.1, "single tap confirmed");
        if let Some(callback) = self.config.on_single_tap_confirmed.clone() {
            callback(point);
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> bool {
        match mouse {
            MouseEvent::Press(MouseButton::Left, col, row) if self.bounds.contains(col, row) => {
                self.drag = Some(Drag {
                    last: self.view_point(col, row),
                    moved: false,
                });
                true
            }
            MouseEvent::Drag(col, row) => {
                let Some(mut drag) = self.drag else {
                    return false;
                };
                let point = self.view_point(col, row);
                let (dx, dy) = (point.0 - drag.last.0, point.1 - drag.last.1);
                if dx != 0.0 || dy != 0.0 {
                    drag.moved = true;
                    drag.last = point;
                    if self.config.enable_translate {
                        self.drag_translate(dx, dy);
                    }
                }
                self.drag = Some(drag);
                true
            }
            MouseEvent::Release(col, row) => {
                let Some(drag) = self.drag.take() else {
                    return false;
                };
                if drag.moved {
                    self.clamp_and_notify();
                    self.gesture_released();
                } else {
                    self.tap(self.view_point(col, row), now);
                }
                true
            }
            MouseEvent::ScrollUp(col, row) | MouseEvent::ScrollDown(col, row)
                if self.config.enable_scale && self.bounds.contains(col, row) =>
            {
                let factor = if matches!(mouse, MouseEvent::ScrollUp(..)) {
                    WHEEL_ZOOM_STEP
                } else {
                    1.0 / WHEEL_ZOOM_STEP
                };
                self.zoom_by(factor, Some(self.view_point(col, row)));
                self.gesture_released();
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: Key) -> bool {
        let step_x = self.view.width as f32 * KEY_PAN_FRACTION;
        let step_y = self.view.height as f32 * KEY_PAN_FRACTION;
        let scale = self.config.enable_scale;
        let pan = self.config.enable_translate;

        match key {
            Key::Char('+') | Key::Char('=') if scale => self.zoom_by(KEY_ZOOM_STEP, None),
            Key::Char('-') if scale => self.zoom_by(1.0 / KEY_ZOOM_STEP, None),
            Key::Char('0') => self.reset(),
            // Moving the view right means moving the content left
            Key::Left | Key::Char('h') if pan => self.translate_by(step_x, 0.0),
            Key::Right | Key::Char('l') if pan => self.translate_by(-step_x, 0.0),
            Key::Up | Key::Char('k') if pan => self.translate_by(0.0, step_y),
            Key::Down | Key::Char('j') if pan => self.translate_by(0.0, -step_y),
            _ => return false,
        }
        self.gesture_released();
        true
    }

    fn tap(&mut self, point: (f32, f32), now: Instant) {
        match self.pending_tap.take() {
            Some((at, _)) if now.duration_since(at) < DOUBLE_TAP_WINDOW => {
                if !self.config.enable_scale {
                    return;
                }
                if self.state.scale > 1.0 {
                    self.reset();
                } else {
                    let target = DOUBLE_TAP_SCALE.min(self.config.max_scale);
                    self.zoom_to(target, Some(point));
                }
                self.gesture_released();
            }
            _ => self.pending_tap = Some((now, point)),
        }
    }

    /// Translate during a drag; with resistance, overscroll is allowed at reduced speed
    fn drag_translate(&mut self, dx: f32, dy: f32) {
        let (max_x, max_y) = self.translate_limits(self.state.scale);
        let overscroll = self
            .config
            .enable_resistance
            .then_some(self.config.max_overscroll_distance);
        self.set_state(TransformState {
            scale: self.state.scale,
            translate_x: resist(self.state.translate_x, dx, max_x, overscroll),
            translate_y: resist(self.state.translate_y, dy, max_y, overscroll),
        });
    }

    /// How far the content may move from center at `scale`
    fn translate_limits(&self, scale: f32) -> (f32, f32) {
        let (fw, fh) = self.fitted_content_size();
        let (vw, vh) = (self.view.width as f32, self.view.height as f32);
        (
            ((fw * scale - vw) / 2.0).max(0.0),
            ((fh * scale - vh) / 2.0).max(0.0),
        )
    }

    fn view_point(&self, col: u16, row: u16) -> (f32, f32) {
        self.geometry.cell_center_in(self.bounds, col, row)
    }

    /// Clamp scale and translation into range, notifying if anything moved
    fn clamp_and_notify(&mut self) {
        let scale = self.state.scale.clamp(1.0, self.config.max_scale);
        let (max_x, max_y) = self.translate_limits(scale);
        self.set_state(TransformState {
            scale,
            translate_x: self.state.translate_x.clamp(-max_x, max_x),
            translate_y: self.state.translate_y.clamp(-max_y, max_y),
        });
    }

    fn set_state(&mut self, state: TransformState) {
        if state == self.state {
            return;
        }
        self.state = state;
        if let Some(callback) = self.config.on_view_transformed.clone() {
            callback(&self.state);
        }
    }

    fn gesture_released(&self) {
        if let Some(callback) = self.config.on_transform_gesture_released.clone() {
            callback(&self.state);
        }
    }
}

impl EventHandler for ViewTransformer {
    fn handle_event(&mut self, event: &Event) -> bool {
        self.handle_event_at(event, Instant::now())
    }
}

/// Apply `delta` to a translation bounded by `limit`, optionally allowing
/// `overscroll` extra at reduced speed
fn resist(current: f32, delta: f32, limit: f32, overscroll: Option<f32>) -> f32 {
    let next = current + delta;
    if next.abs() <= limit {
        return next;
    }
    let Some(over) = overscroll else {
        return next.clamp(-limit, limit);
    };
    let outward = next.abs() > current.abs();
    let candidate = if outward {
        current + delta * RESISTANCE
    } else {
        next
    };
    candidate.clamp(-(limit + over), limit + over)
}
