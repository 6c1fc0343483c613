//! Background-decoded image/video element
//!
//! Decoding runs on a worker thread. The element owns the receiving end of a
//! bounded channel; dropping the element disconnects it and the worker exits
//! on its next send.

use super::video::{stream_frames, Decoded};
use super::{LoadError, LoadEvent, MediaKind, MediaSignal, MediaSource, NaturalSize};
use crate::layout::Rect;
use crate::render::Renderer;
use crate::terminal::TerminalGeometry;
use crate::transform::Projection;
use anyhow::Result;
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

/// Decoded frames buffered ahead of playback
const FRAME_QUEUE_DEPTH: usize = 2;

/// Decoder and current frame for one source
pub struct MediaElement {
    source: MediaSource,
    kind: MediaKind,
    rx: Option<Receiver<Decoded>>,
    pending: VecDeque<MediaSignal>,
    frame: Option<RgbImage>,
    frame_interval: Option<Duration>,
    next_frame_at: Option<Instant>,
    frame_seq: u64,
    loaded: bool,
}

impl MediaElement {
    /// Start decoding `source`. The load-start signal is queued immediately.
    pub fn mount(source: MediaSource) -> Self {
        let kind = source.kind();
        let mut element = MediaElement {
            source: source.clone(),
            kind,
            rx: None,
            pending: VecDeque::new(),
            frame: None,
            frame_interval: None,
            next_frame_at: None,
            frame_seq: 0,
            loaded: false,
        };
        element
            .pending
            .push_back(MediaSignal::LoadStart(LoadEvent::started(&source)));

        match element.spawn_worker() {
            Ok(rx) => element.rx = Some(rx),
            Err(e) => element.pending.push_back(MediaSignal::Failed(e)),
        }
        element
    }

    fn spawn_worker(&self) -> Result<Receiver<Decoded>, LoadError> {
        let (tx, rx) = mpsc::sync_channel(FRAME_QUEUE_DEPTH);
        let source = self.source.clone();

        let builder = thread::Builder::new().name("mkview-decode".into());
        match self.kind {
            MediaKind::Image => {
                builder.spawn(move || {
                    let msg = match decode_image(&source) {
                        Ok(image) => {
                            let event = LoadEvent {
                                source: source.clone(),
                                kind: MediaKind::Image,
                                size: Some(NaturalSize::new(image.width(), image.height())),
                                frame_rate: None,
                            };
                            Decoded::Loaded(event, image)
                        }
                        Err(e) => Decoded::Failed(e),
                    };
                    let _ = tx.send(msg);
                })?;
            }
            MediaKind::Video => {
                let locator = self.source.to_string();
                let input = locator
                    .strip_prefix("file://")
                    .unwrap_or(&locator)
                    .to_string();
                builder.spawn(move || stream_frames(source, input, tx))?;
            }
        }
        Ok(rx)
    }

    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Whether the first frame has arrived
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Bumped whenever a new frame replaces the current one
    pub fn frame_seq(&self) -> u64 {
        self.frame_seq
    }

    /// Size of the current frame
    pub fn frame_size(&self) -> Option<NaturalSize> {
        self.frame
            .as_ref()
            .map(|f| NaturalSize::new(f.width(), f.height()))
    }

    /// Collect signals and advance video playback to `now`
    pub fn poll(&mut self, now: Instant) -> Vec<MediaSignal> {
        let mut signals: Vec<MediaSignal> = self.pending.drain(..).collect();

        loop {
            if self.next_frame_at.is_some_and(|at| now < at) {
                break;
            }
            let Some(rx) = self.rx.as_ref() else {
                break;
            };
            let msg = rx.try_recv();
            match msg {
                Ok(Decoded::Loaded(event, frame)) => {
                    self.frame = Some(frame);
                    self.frame_seq += 1;
                    self.loaded = true;
                    self.frame_interval = event.frame_rate.and_then(frame_interval);
                    self.advance_clock(now);
                    signals.push(MediaSignal::Loaded(event));
                }
                Ok(Decoded::Frame(frame)) => {
                    self.frame = Some(frame);
                    self.frame_seq += 1;
                    self.advance_clock(now);
                }
                Ok(Decoded::Failed(e)) => {
                    signals.push(MediaSignal::Failed(e));
                    self.rx = None;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.rx = None,
            }
        }
        signals
    }

    /// Schedule the next video frame, skipping ahead if playback fell behind
    fn advance_clock(&mut self, now: Instant) {
        let Some(interval) = self.frame_interval else {
            return;
        };
        let next = self.next_frame_at.map_or(now, |at| at + interval);
        self.next_frame_at = Some(if next <= now { now + interval } else { next });
    }

    /// Draw the projected part of the current frame inside `bounds`
    pub fn render_projected(
        &self,
        renderer: &mut Renderer,
        bounds: Rect,
        geometry: &TerminalGeometry,
        projection: &Projection,
    ) -> Result<()> {
        let Some(frame) = self.frame.as_ref().filter(|f| f.width() > 0 && f.height() > 0) else {
            return Ok(());
        };
        let Some(dest) = dest_cells(bounds, geometry, projection) else {
            return Ok(());
        };

        let (fw, fh) = (frame.width() as f32, frame.height() as f32);
        let x0 = ((projection.u0 * fw).floor() as u32).min(frame.width() - 1);
        let y0 = ((projection.v0 * fh).floor() as u32).min(frame.height() - 1);
        let x1 = ((projection.u1 * fw).ceil() as u32).clamp(x0 + 1, frame.width());
        let y1 = ((projection.v1 * fh).ceil() as u32).clamp(y0 + 1, frame.height());
        let mut crop = imageops::crop_imm(frame, x0, y0, x1 - x0, y1 - y0).to_image();

        // Never ship more pixels than the cells can show
        let target_w = dest.width as u32 * geometry.char_width.max(1) as u32;
        let target_h = dest.height as u32 * geometry.char_height.max(1) as u32;
        if crop.width() > target_w || crop.height() > target_h {
            crop = imageops::resize(&crop, target_w, target_h, FilterType::Triangle);
        }

        renderer.render_image(crop.as_raw(), crop.width(), crop.height(), dest)
    }
}

impl Drop for MediaElement {
    fn drop(&mut self) {
        crate::trace_debug!(source = %self.source, "media element dropped");
    }
}

/// Time between frames at `fps`; None for rates that give no usable interval
fn frame_interval(fps: f32) -> Option<Duration> {
    if fps <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f32(1.0 / fps)
        .ok()
        .filter(|interval| !interval.is_zero())
}

/// Cell rectangle covering a projection's destination, clipped to `bounds`
fn dest_cells(bounds: Rect, geometry: &TerminalGeometry, projection: &Projection) -> Option<Rect> {
    let cw = geometry.char_width.max(1) as f32;
    let ch = geometry.char_height.max(1) as f32;
    let (col0, row0) = geometry.pixels_to_cells(projection.dest_x, projection.dest_y);
    let col1 = ((projection.dest_x + projection.dest_w) / cw).ceil() as u16;
    let row1 = ((projection.dest_y + projection.dest_h) / ch).ceil() as u16;

    let width = col1.min(bounds.width).saturating_sub(col0);
    let height = row1.min(bounds.height).saturating_sub(row0);
    let rect = Rect::new(
        bounds.x.saturating_add(col0),
        bounds.y.saturating_add(row0),
        width,
        height,
    );
    (!rect.is_empty()).then_some(rect)
}

fn decode_image(source: &MediaSource) -> Result<RgbImage, LoadError> {
    let image = match source {
        MediaSource::Bundled { bytes, .. } => image::load_from_memory(bytes)?,
        MediaSource::Uri(_) => {
            let path = source.local_path().ok_or_else(|| {
                LoadError::Unsupported(format!("cannot fetch {}", source))
            })?;
            image::open(path)?
        }
    };
    Ok(image.to_rgb8())
}
