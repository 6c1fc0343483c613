//! Built-in UI components

pub mod loading;
pub mod transformable;

pub use loading::LoadingIndicator;
pub use transformable::{LoadCallback, MediaProps, TransformableMedia};
