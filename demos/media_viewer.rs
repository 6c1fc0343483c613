//! Media Viewer Demo - pan/zoom viewer for images and videos
//!
//! Usage: media_viewer [--debug] <file>...
//!
//! Controls:
//! - Mouse wheel: zoom about the pointer
//! - Drag: pan
//! - Double click: toggle 2x zoom
//! - +/-: Zoom in/out
//! - Arrow keys / hjkl: Pan
//! - 0: Reset
//! - n/p: Next/previous file
//! - q/Esc: Quit
//!
//! Logs go to stderr; redirect it (`2>viewer.log`) and set `RUST_LOG=debug`
//! together with `--debug` to see the viewer's traces.

use anyhow::{bail, Result};
use mkview::{
    components::{LoadingIndicator, MediaProps, TransformableMedia},
    event::{Event, EventHandler, EventPoller, Key},
    layout::Rect,
    media::MediaSource,
    style::{Color, Style},
    Component, RenderContext, Renderer,
};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const FRAME_BUDGET: Duration = Duration::from_millis(16);
const IDLE_POLL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mkview=info,media_viewer=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut files = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--debug" {
            TransformableMedia::enable_debug();
        } else {
            files.push(arg);
        }
    }
    if files.is_empty() {
        bail!("usage: media_viewer [--debug] <file>...");
    }

    let mut renderer = Renderer::new()?;
    tracing::info!(backend = renderer.graphics_backend().name(), "starting viewer");

    renderer.enter_alt_screen()?;
    renderer.hide_cursor()?;
    let events = EventPoller::new()?;

    let style = Style::new().background(Color::black()).padding(1);
    let props = MediaProps::new(MediaSource::uri(files[0].clone()))
        .with_style(style)
        .with_enable_resistance(true)
        .with_placeholder(LoadingIndicator::new())
        .on_load(|event| tracing::info!(source = %event.source, size = ?event.size, "loaded"))
        .on_single_tap_confirmed(|(x, y)| tracing::debug!(x, y, "tap"));
    let mut viewer = TransformableMedia::new(props);
    viewer.on_mount();

    let mut index = 0usize;
    let mut needs_redraw = true;

    loop {
        if viewer.update(Instant::now()) {
            needs_redraw = true;
        }

        if needs_redraw {
            let geometry = renderer.geometry();
            let base = Style::new();
            let ctx = RenderContext::new(&geometry, &base);
            let bounds = Rect::fullscreen(geometry.cols, geometry.rows);

            renderer.begin_frame()?;
            viewer.render(&mut renderer, bounds, &ctx)?;
            renderer.end_frame()?;
            needs_redraw = false;
        }

        let timeout = if viewer.load_state().is_loaded() {
            FRAME_BUDGET
        } else {
            IDLE_POLL
        };
        let Some(event) = events.poll(timeout)? else {
            continue;
        };

        match event {
            Event::Key(Key::Char('q')) | Event::Key(Key::Esc) | Event::Key(Key::Ctrl('c')) => break,
            Event::Key(Key::Char('n')) => {
                index = (index + 1) % files.len();
                viewer.set_source(MediaSource::uri(files[index].clone()), None);
                needs_redraw = true;
            }
            Event::Key(Key::Char('p')) => {
                index = (index + files.len() - 1) % files.len();
                viewer.set_source(MediaSource::uri(files[index].clone()), None);
                needs_redraw = true;
            }
            Event::Resize(..) => {
                renderer.refresh_geometry()?;
                renderer.clear()?;
                needs_redraw = true;
            }
            other => {
                if viewer.handle_event(&other) {
                    needs_redraw = true;
                }
            }
        }
    }

    renderer.clear_images()?;
    renderer.exit_alt_screen()?;
    renderer.show_cursor()?;
    renderer.flush()?;
    Ok(())
}
