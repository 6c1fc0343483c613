//! mkview - A pan/zoom media viewport component for terminal UIs
//!
//! Shows an image or video inside a zoomable, pannable viewport:
//! - Natural size from the caller or probed in the background
//! - Zoom limit and aspect ratio derived from natural and on-screen size
//! - Loading placeholder, with gestures held back until the first frame
//! - Kitty graphics protocol or Unicode half blocks for output
//! - Immediate mode rendering with retained component structure

pub mod component;
pub mod components;
pub mod context;
pub mod diagnostics;
pub mod event;
pub mod graphics;
pub mod layout;
pub mod load_state;
pub mod media;
pub mod render;
pub mod resolver;
pub mod style;
pub mod terminal;
pub mod transform;

// Re-export commonly used types
pub use component::Component;
pub use components::{LoadingIndicator, MediaProps, TransformableMedia};
pub use context::RenderContext;
pub use diagnostics::{debug_enabled, enable_debug};
pub use event::{Event, EventHandler, Key};
pub use graphics::GraphicsBackend;
pub use layout::{LayoutSize, Rect};
pub use load_state::LoadState;
pub use media::{MediaKind, MediaSource, NaturalSize};
pub use render::Renderer;
pub use resolver::{DimensionResolver, Resolution};
pub use style::{Color, Style};
pub use terminal::{TerminalContext, TerminalGeometry};
pub use transform::{TransformParams, TransformState, ViewTransformer};
