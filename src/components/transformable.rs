//! Pan/zoom media viewer component
//!
//! `TransformableMedia` shows an image or video inside a [`ViewTransformer`].
//! It resolves the natural size of the media, derives the zoom limit and
//! aspect ratio from it and the on-screen box, shows a placeholder until the
//! first frame arrives, and keeps gestures disabled until then.
//!
//! # Example
//! ```ignore
//! let props = MediaProps::new(MediaSource::uri("photo.jpg"))
//!     .with_placeholder(LoadingIndicator::new())
//!     .on_single_tap_confirmed(|(x, y)| println!("tap at {x},{y}"));
//! let mut viewer = TransformableMedia::new(props);
//! viewer.on_mount();
//! // each frame:
//! viewer.update(Instant::now());
//! viewer.render(&mut renderer, bounds, &ctx)?;
//! ```

use crate::component::Component;
use crate::context::RenderContext;
use crate::event::{Event, EventHandler};
use crate::layout::{LayoutSize, LayoutTracker, Rect};
use crate::load_state::LoadState;
use crate::media::{LoadEvent, MediaElement, MediaSignal, MediaSource, NaturalSize, SizeProbe};
use crate::render::Renderer;
use crate::resolver::{DimensionResolver, Resolution};
use crate::style::Style;
use crate::terminal::TerminalGeometry;
use crate::transform::{
    forward, TapCallback, TransformCallback, TransformParams, TransformState, TransformerProps,
    ViewTransformer,
};
use anyhow::Result;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

/// Called with the load-start or load-complete payload
pub type LoadCallback = Rc<dyn Fn(&LoadEvent)>;

/// Configuration for [`TransformableMedia`]
pub struct MediaProps {
    pub source: MediaSource,
    /// Trusted natural size; when set, no probing happens
    pub pixels: Option<NaturalSize>,
    pub enable_transform: Option<bool>,
    pub enable_scale: Option<bool>,
    pub enable_translate: Option<bool>,
    pub enable_resistance: Option<bool>,
    pub max_overscroll_distance: Option<f32>,
    /// Overrides the computed zoom limit
    pub max_scale: Option<f32>,
    /// Shown over the media area until loaded
    pub placeholder: Option<Box<dyn Component>>,
    pub on_load_start: Option<LoadCallback>,
    pub on_load: Option<LoadCallback>,
    pub on_single_tap_confirmed: Option<TapCallback>,
    pub on_transform_gesture_released: Option<TransformCallback>,
    pub on_view_transformed: Option<TransformCallback>,
    pub style: Style,
}

impl MediaProps {
    pub fn new(source: MediaSource) -> Self {
        MediaProps {
            source,
            pixels: None,
            enable_transform: Some(true),
            enable_scale: Some(true),
            enable_translate: Some(true),
            enable_resistance: None,
            max_overscroll_distance: None,
            max_scale: None,
            placeholder: None,
            on_load_start: None,
            on_load: None,
            on_single_tap_confirmed: None,
            on_transform_gesture_released: None,
            on_view_transformed: None,
            style: Style::default(),
        }
    }

    pub fn with_pixels(mut self, size: NaturalSize) -> Self {
        self.pixels = Some(size);
        self
    }

    pub fn with_enable_transform(mut self, enabled: bool) -> Self {
        self.enable_transform = Some(enabled);
        self
    }

    pub fn with_enable_scale(mut self, enabled: bool) -> Self {
        self.enable_scale = Some(enabled);
        self
    }

    pub fn with_enable_translate(mut self, enabled: bool) -> Self {
        self.enable_translate = Some(enabled);
        self
    }

    pub fn with_enable_resistance(mut self, enabled: bool) -> Self {
        self.enable_resistance = Some(enabled);
        self
    }

    pub fn with_max_overscroll_distance(mut self, distance: f32) -> Self {
        self.max_overscroll_distance = Some(distance);
        self
    }

    pub fn with_max_scale(mut self, scale: f32) -> Self {
        self.max_scale = Some(scale);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Component + 'static) -> Self {
        self.placeholder = Some(Box::new(placeholder));
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn on_load_start<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LoadEvent) + 'static,
    {
        self.on_load_start = Some(Rc::new(callback));
        self
    }

    pub fn on_load<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LoadEvent) + 'static,
    {
        self.on_load = Some(Rc::new(callback));
        self
    }

    pub fn on_single_tap_confirmed<F>(mut self, callback: F) -> Self
    where
        F: Fn((f32, f32)) + 'static,
    {
        self.on_single_tap_confirmed = Some(Rc::new(callback));
        self
    }

    pub fn on_transform_gesture_released<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TransformState) + 'static,
    {
        self.on_transform_gesture_released = Some(Rc::new(callback));
        self
    }

    pub fn on_view_transformed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TransformState) + 'static,
    {
        self.on_view_transformed = Some(Rc::new(callback));
        self
    }
}

/// Image/video viewport with pan and zoom
pub struct TransformableMedia {
    props: MediaProps,
    resolver: DimensionResolver,
    natural_size: Option<NaturalSize>,
    layout: LayoutTracker,
    load_state: LoadState,
    /// Bumped on every source change
    epoch: u64,
    transformer: ViewTransformer,
    element: Option<MediaElement>,
    last_frame_seq: u64,
    dirty: bool,
}

impl TransformableMedia {
    /// Nothing is loaded until `on_mount` (or the first `update`/`render`)
    pub fn new(props: MediaProps) -> Self {
        TransformableMedia {
            props,
            resolver: DimensionResolver::new(),
            natural_size: None,
            layout: LayoutTracker::new(),
            load_state: LoadState::default(),
            epoch: 1,
            transformer: ViewTransformer::new(),
            element: None,
            last_frame_seq: 0,
            dirty: true,
        }
    }

    /// Use a different size probe
    pub fn with_probe(mut self, probe: Arc<dyn SizeProbe>) -> Self {
        self.resolver = DimensionResolver::with_probe(probe);
        self
    }

    /// Turn on verbose diagnostics for every instance in the process
    pub fn enable_debug() {
        crate::diagnostics::enable_debug();
    }

    pub fn debug_enabled() -> bool {
        crate::diagnostics::debug_enabled()
    }

    /// Switch to different media. Returns false if `source` is the current one.
    ///
    /// All per-media state is rebuilt: the natural size is cleared before the
    /// new resolution starts, pan/zoom returns to identity, and the element
    /// is remounted. For the current source only the trusted size is taken.
    pub fn set_source(&mut self, source: MediaSource, pixels: Option<NaturalSize>) -> bool {
        if source.same_as(&self.props.source) {
            self.set_pixels(pixels);
            return false;
        }
        crate::trace_debug!(from = %self.props.source, to = %source, "source changed");
        self.props.source = source;
        self.props.pixels = pixels;
        self.epoch += 1;
        self.mount_media();
        true
    }

    /// Replace the trusted size of the current media without remounting it.
    /// Clearing it probes the source again.
    pub fn set_pixels(&mut self, pixels: Option<NaturalSize>) {
        if pixels == self.props.pixels {
            return;
        }
        self.props.pixels = pixels;
        match pixels {
            Some(size) => self.set_natural_size(size),
            None => {
                self.natural_size = None;
                self.dirty = true;
                self.resolver.resolve(&self.props.source, None);
            }
        }
        self.sync_transformer();
    }

    /// Record the on-screen box. Returns true if its pixel size changed.
    pub fn on_layout(&mut self, bounds: Rect, geometry: &TerminalGeometry) -> bool {
        let size = geometry.layout_size(bounds);
        if !self.layout.on_layout(size) {
            return false;
        }
        crate::trace_debug!(width = size.width, height = size.height, "layout changed");
        self.dirty = true;
        true
    }

    /// The caller's handler runs before the state changes
    pub fn on_load_start(&mut self, event: &LoadEvent) {
        if let Some(callback) = self.props.on_load_start.clone() {
            callback(event);
        }
        self.load_state.on_load_start();
        self.sync_transformer();
        self.dirty = true;
    }

    /// The caller's handler runs before the state changes
    pub fn on_load(&mut self, event: &LoadEvent) {
        if let Some(callback) = self.props.on_load.clone() {
            callback(event);
        }
        crate::trace_debug!(source = %event.source, size = ?event.size, "media loaded");
        self.load_state.on_load_complete();
        self.sync_transformer();
        self.dirty = true;
    }

    /// Drain probe results and media signals, confirm pending taps.
    /// Returns true if a redraw is needed.
    pub fn update(&mut self, now: Instant) -> bool {
        self.ensure_mounted();

        if let Some(size) = self.resolver.poll() {
            self.set_natural_size(size);
        }

        let mut signals = Vec::new();
        if let Some(element) = self.element.as_mut() {
            signals = element.poll(now);
            if element.frame_seq() != self.last_frame_seq {
                self.last_frame_seq = element.frame_seq();
                self.dirty = true;
            }
        }
        for signal in signals {
            match signal {
                MediaSignal::LoadStart(event) => self.on_load_start(&event),
                MediaSignal::Loaded(event) => self.on_load(&event),
                MediaSignal::Failed(e) => {
                    tracing::error!(source = %self.props.source, error = %e, "media failed to load");
                }
            }
        }

        if self.transformer.tick(now) {
            self.dirty = true;
        }
        // Placeholders animate while loading
        self.dirty || (!self.load_state.is_loaded() && self.props.placeholder.is_some())
    }

    /// Handle an input event received at `now`
    pub fn handle_event_at(&mut self, event: &Event, now: Instant) -> bool {
        self.sync_transformer();
        let consumed = self.transformer.handle_event_at(event, now);
        if consumed {
            self.dirty = true;
        }
        consumed
    }

    /// Live transformer, for programmatic reset/zoom
    pub fn view_transformer(&self) -> &ViewTransformer {
        &self.transformer
    }

    pub fn view_transformer_mut(&mut self) -> &mut ViewTransformer {
        self.dirty = true;
        &mut self.transformer
    }

    /// Zoom limit and aspect ratio for the current sizes
    pub fn transform_params(&self) -> TransformParams {
        TransformParams::compute(self.natural_size, self.layout.size())
    }

    pub fn natural_size(&self) -> Option<NaturalSize> {
        self.natural_size
    }

    pub fn layout_size(&self) -> Option<LayoutSize> {
        self.layout.size()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn source(&self) -> &MediaSource {
        &self.props.source
    }

    /// Transformer configuration for the current state
    ///
    /// Computed defaults first, then whatever the caller set, then the
    /// load gate on `enable_transform`.
    pub fn transformer_props(&self) -> TransformerProps {
        let params = self.transform_params();
        let mut props = TransformerProps {
            max_scale: Some(params.max_scale),
            content_aspect_ratio: params.content_aspect_ratio,
            enable_resistance: Some(true),
            ..Default::default()
        };
        props.overlay(forward(&self.props));

        let requested = props.enable_transform.unwrap_or(true);
        props.enable_transform = Some(requested && self.load_state.is_loaded());
        props
    }

    fn sync_transformer(&mut self) {
        let props = self.transformer_props();
        self.transformer.configure(&props);
    }

    fn set_natural_size(&mut self, size: NaturalSize) {
        if self.natural_size == Some(size) {
            return;
        }
        crate::trace_debug!(width = size.width, height = size.height, "natural size resolved");
        self.natural_size = Some(size);
        self.dirty = true;
    }

    fn ensure_mounted(&mut self) {
        if self.element.is_none() {
            self.mount_media();
        }
    }

    /// Fresh per-media state, then resolve and start decoding
    fn mount_media(&mut self) {
        self.natural_size = None;
        self.load_state.reset();
        self.transformer = ViewTransformer::new();
        self.element = None;
        self.last_frame_seq = 0;

        if let Resolution::Trusted(size) = self
            .resolver
            .resolve(&self.props.source, self.props.pixels)
        {
            self.set_natural_size(size);
        }
        self.element = Some(MediaElement::mount(self.props.source.clone()));
        self.sync_transformer();
        self.dirty = true;
    }
}

impl EventHandler for TransformableMedia {
    fn handle_event(&mut self, event: &Event) -> bool {
        self.handle_event_at(event, Instant::now())
    }
}

impl Component for TransformableMedia {
    fn render(&mut self, renderer: &mut Renderer, bounds: Rect, ctx: &RenderContext) -> Result<()> {
        self.ensure_mounted();

        let style = self.props.style;
        if let Some(bg) = style.background {
            renderer.fill_rect(bounds, bg)?;
        }
        let content = style.content_bounds(bounds);

        self.on_layout(content, ctx.geometry);
        self.sync_transformer();
        self.transformer.set_viewport(content, *ctx.geometry);

        if let (Some(element), Some(projection)) = (&self.element, self.transformer.project()) {
            element.render_projected(renderer, content, ctx.geometry, &projection)?;
        }

        if !self.load_state.is_loaded() {
            if let Some(placeholder) = self.props.placeholder.as_mut() {
                let child_ctx = RenderContext::new(ctx.geometry, &style);
                placeholder.render(renderer, content, &child_ctx)?;
            }
        }

        self.dirty = false;
        Ok(())
    }

    fn on_mount(&mut self) {
        self.ensure_mounted();
    }

    /// Stops decoding; a later mount starts over
    fn on_unmount(&mut self) {
        self.element = None;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn name(&self) -> &str {
        "TransformableMedia"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::LoadingIndicator;
    use crate::event::Key;
    use crate::media::ProbeError;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    /// Answers from a fixed table; locators with a gate wait for it to open
    #[derive(Default)]
    struct TableProbe {
        sizes: HashMap<String, NaturalSize>,
        gates: Mutex<HashMap<String, Receiver<()>>>,
    }

    impl TableProbe {
        fn with(entries: &[(&str, NaturalSize)]) -> Self {
            TableProbe {
                sizes: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect(),
                gates: Mutex::default(),
            }
        }

        fn gate(&self, locator: &str) -> Sender<()> {
            let (tx, rx) = mpsc::channel();
            self.gates.lock().unwrap().insert(locator.to_string(), rx);
            tx
        }
    }

    impl SizeProbe for TableProbe {
        fn probe(&self, locator: &str) -> std::result::Result<NaturalSize, ProbeError> {
            let gate = self.gates.lock().unwrap().remove(locator);
            if let Some(gate) = gate {
                let _ = gate.recv();
            }
            self.sizes
                .get(locator)
                .copied()
                .ok_or_else(|| ProbeError::Tool(format!("unknown {}", locator)))
        }
    }

    /// Placeholder that counts its renders
    struct Counter(Rc<Cell<usize>>);

    impl EventHandler for Counter {}

    impl Component for Counter {
        fn render(&mut self, _: &mut Renderer, _: Rect, _: &RenderContext) -> Result<()> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    fn render(media: &mut TransformableMedia, bounds: Rect) {
        let mut renderer = Renderer::headless();
        let geometry = TerminalGeometry::with_char_size(80, 24, 10, 20);
        let style = Style::new();
        let ctx = RenderContext::new(&geometry, &style);
        media.render(&mut renderer, bounds, &ctx).unwrap();
    }

    fn loaded_event(media: &TransformableMedia) -> LoadEvent {
        LoadEvent::started(media.source())
    }

    fn update_until(media: &mut TransformableMedia, done: impl Fn(&TransformableMedia) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline && !done(media) {
            media.update(Instant::now());
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_source_change_clears_size_and_bumps_epoch() {
        let probe = Arc::new(TableProbe::with(&[("b.png", NaturalSize::new(10, 10))]));
        let _hold = probe.gate("b.png");
        let props =
            MediaProps::new(MediaSource::uri("a.png")).with_pixels(NaturalSize::new(1000, 500));
        let mut media = TransformableMedia::new(props).with_probe(probe);
        media.on_mount();
        assert_eq!(media.natural_size(), Some(NaturalSize::new(1000, 500)));
        assert_eq!(media.epoch(), 1);

        assert!(media.set_source(MediaSource::uri("b.png"), None));
        assert_eq!(media.natural_size(), None);
        assert_eq!(media.epoch(), 2);

        // Same source again is not a change
        assert!(!media.set_source(MediaSource::uri("b.png"), None));
        assert_eq!(media.epoch(), 2);
    }

    #[test]
    fn test_new_pixels_for_same_source_keep_media() {
        let probe = Arc::new(TableProbe::with(&[("a.png", NaturalSize::new(300, 300))]));
        let props =
            MediaProps::new(MediaSource::uri("a.png")).with_pixels(NaturalSize::new(1000, 500));
        let mut media = TransformableMedia::new(props).with_probe(probe);
        media.on_mount();
        media.update(Instant::now());
        render(&mut media, Rect::new(0, 0, 20, 10));
        let event = loaded_event(&media);
        media.on_load(&event);
        media.view_transformer_mut().zoom_to(2.0, None);

        assert!(!media.set_source(MediaSource::uri("a.png"), Some(NaturalSize::new(2000, 1000))));
        assert_eq!(media.epoch(), 1);
        assert_eq!(media.load_state(), LoadState::Loaded);
        assert_eq!(media.natural_size(), Some(NaturalSize::new(2000, 1000)));
        assert_eq!(media.transform_params().max_scale, 10.0);
        assert_eq!(media.view_transformer().transform().scale, 2.0);

        // Dropping the trusted size falls back to probing
        assert!(!media.set_source(MediaSource::uri("a.png"), None));
        assert_eq!(media.natural_size(), None);
        update_until(&mut media, |m| m.natural_size().is_some());
        assert_eq!(media.natural_size(), Some(NaturalSize::new(300, 300)));
        assert_eq!(media.epoch(), 1);
        assert_eq!(media.load_state(), LoadState::Loaded);
    }

    #[test]
    fn test_update_keeps_redrawing_loading_placeholder() {
        let props = MediaProps::new(MediaSource::uri("a.png"))
            .with_pixels(NaturalSize::new(10, 10))
            .with_placeholder(LoadingIndicator::new());
        let mut media = TransformableMedia::new(props);
        media.on_mount();
        media.update(Instant::now());
        render(&mut media, Rect::new(0, 0, 20, 10));
        assert!(!media.is_dirty());
        assert!(media.update(Instant::now()));

        let event = loaded_event(&media);
        media.on_load(&event);
        render(&mut media, Rect::new(0, 0, 20, 10));
        assert!(!media.update(Instant::now()));
    }

    #[test]
    fn test_stale_probe_never_lands() {
        let probe = Arc::new(TableProbe::with(&[
            ("a.png", NaturalSize::new(111, 111)),
            ("b.png", NaturalSize::new(200, 100)),
        ]));
        let open_a = probe.gate("a.png");
        let open_b = probe.gate("b.png");

        let mut media =
            TransformableMedia::new(MediaProps::new(MediaSource::uri("a.png"))).with_probe(probe);
        media.on_mount();
        media.set_source(MediaSource::uri("b.png"), None);

        open_a.send(()).unwrap();
        let deadline = Instant::now() + Duration::from_millis(200);
        while Instant::now() < deadline {
            media.update(Instant::now());
            assert_eq!(media.natural_size(), None);
            thread::sleep(Duration::from_millis(10));
        }

        open_b.send(()).unwrap();
        update_until(&mut media, |m| m.natural_size().is_some());
        assert_eq!(media.natural_size(), Some(NaturalSize::new(200, 100)));
    }

    #[test]
    fn test_bundled_without_pixels_stays_unknown() {
        let props = MediaProps::new(MediaSource::bundled("logo", vec![0u8; 4]));
        let mut media = TransformableMedia::new(props);
        media.on_mount();
        render(&mut media, Rect::new(0, 0, 20, 10));

        assert_eq!(media.natural_size(), None);
        assert_eq!(media.transform_params().max_scale, 1.0);
        assert_eq!(media.transform_params().content_aspect_ratio, None);
    }

    #[test]
    fn test_load_complete_is_idempotent_and_calls_back() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let props = MediaProps::new(MediaSource::uri("a.png"))
            .with_pixels(NaturalSize::new(10, 10))
            .on_load(move |_| seen.set(seen.get() + 1));
        let mut media = TransformableMedia::new(props);
        media.on_mount();

        let event = loaded_event(&media);
        media.on_load(&event);
        media.on_load(&event);
        assert_eq!(media.load_state(), LoadState::Loaded);
        assert_eq!(calls.get(), 2);

        media.on_load_start(&event);
        assert_eq!(media.load_state(), LoadState::NotLoaded);
    }

    #[test]
    fn test_gestures_wait_for_load() {
        let props =
            MediaProps::new(MediaSource::uri("a.png")).with_pixels(NaturalSize::new(1000, 500));
        let mut media = TransformableMedia::new(props);
        media.on_mount();
        render(&mut media, Rect::new(0, 0, 20, 10));
        assert_eq!(media.transform_params().max_scale, 5.0);

        let zoom = Event::Key(Key::Char('+'));
        assert!(!media.handle_event_at(&zoom, Instant::now()));
        assert!(!media.view_transformer().is_enabled());

        let event = loaded_event(&media);
        media.on_load(&event);
        assert!(media.handle_event_at(&zoom, Instant::now()));
        assert!(media.view_transformer().transform().scale > 1.0);
    }

    #[test]
    fn test_caller_can_disable_transform_after_load() {
        let props = MediaProps::new(MediaSource::uri("a.png"))
            .with_pixels(NaturalSize::new(1000, 500))
            .with_enable_transform(false);
        let mut media = TransformableMedia::new(props);
        media.on_mount();
        let event = loaded_event(&media);
        media.on_load(&event);
        assert!(!media.view_transformer().is_enabled());
    }

    #[test]
    fn test_forwarded_max_scale_overrides_computed() {
        let props = MediaProps::new(MediaSource::uri("a.png"))
            .with_pixels(NaturalSize::new(1000, 500))
            .with_max_scale(2.0);
        let mut media = TransformableMedia::new(props);
        media.on_mount();
        render(&mut media, Rect::new(0, 0, 20, 10));

        assert_eq!(media.transform_params().max_scale, 5.0);
        assert_eq!(media.view_transformer().max_scale(), 2.0);
        assert_eq!(media.view_transformer().content_aspect_ratio(), Some(2.0));
    }

    #[test]
    fn test_placeholder_only_while_loading() {
        let renders = Rc::new(Cell::new(0));
        let props = MediaProps::new(MediaSource::uri("a.png"))
            .with_pixels(NaturalSize::new(10, 10))
            .with_placeholder(Counter(renders.clone()));
        let mut media = TransformableMedia::new(props);
        media.on_mount();

        render(&mut media, Rect::new(0, 0, 20, 10));
        assert_eq!(renders.get(), 1);

        let event = loaded_event(&media);
        media.on_load(&event);
        render(&mut media, Rect::new(0, 0, 20, 10));
        assert_eq!(renders.get(), 1);
    }

    #[test]
    fn test_source_change_resets_transform() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        let props = MediaProps::new(MediaSource::uri("a.png"))
            .with_pixels(NaturalSize::new(1000, 500))
            .on_view_transformed(move |s| sink.borrow_mut().push(*s));
        let mut media = TransformableMedia::new(props);
        media.on_mount();
        render(&mut media, Rect::new(0, 0, 20, 10));
        let event = loaded_event(&media);
        media.on_load(&event);

        media.view_transformer_mut().zoom_to(3.0, None);
        assert_eq!(media.view_transformer().transform().scale, 3.0);
        assert_eq!(changes.borrow().len(), 1);

        media.set_source(MediaSource::uri("c.png"), Some(NaturalSize::new(10, 10)));
        assert_eq!(media.view_transformer().transform(), TransformState::default());
        assert_eq!(media.load_state(), LoadState::NotLoaded);
    }

    #[test]
    fn test_layout_only_changes_on_new_size() {
        let mut media = TransformableMedia::new(MediaProps::new(MediaSource::uri("a.png")));
        let geometry = TerminalGeometry::with_char_size(80, 24, 10, 20);
        assert!(media.on_layout(Rect::new(0, 0, 25, 10), &geometry));
        assert!(!media.on_layout(Rect::new(5, 5, 25, 10), &geometry));
        assert_eq!(media.layout_size(), Some(LayoutSize::new(250, 200)));
    }

    #[test]
    fn test_real_png_loads_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::from_pixel(40, 10, image::Rgb([0, 128, 255]))
            .save(&path)
            .unwrap();

        let started = Rc::new(Cell::new(false));
        let flag = started.clone();
        let props = MediaProps::new(MediaSource::uri(path.to_str().unwrap()))
            .on_load_start(move |_| flag.set(true));
        let mut media = TransformableMedia::new(props);
        media.on_mount();
        update_until(&mut media, |m| {
            m.load_state().is_loaded() && m.natural_size().is_some()
        });

        assert!(started.get());
        assert_eq!(media.natural_size(), Some(NaturalSize::new(40, 10)));
        assert_eq!(media.transform_params().content_aspect_ratio, Some(4.0));
        render(&mut media, Rect::new(0, 0, 20, 10));
        assert!(!media.is_dirty());
    }
}
