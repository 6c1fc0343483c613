//! Media sources, classification, and load signalling
//!
//! A [`MediaSource`] names what to show. [`MediaKind::classify`] picks the
//! image or video path from the locator alone. Decoding happens in
//! [`MediaElement`], which reports progress as [`MediaSignal`]s.

mod element;
mod probe;
mod video;

pub use element::MediaElement;
pub use probe::{PlatformProbe, ProbeError, SizeProbe};
pub use video::{parse_ffprobe_stream, VideoInfo};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Suffixes that select the video path
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "webm", "mkv"];

/// Where the media comes from
#[derive(Clone)]
pub enum MediaSource {
    /// Local path, `file://` URI, or remote URL
    Uri(String),
    /// In-memory asset with no retrievable locator
    Bundled { name: String, bytes: Arc<[u8]> },
}

impl MediaSource {
    pub fn uri(uri: impl Into<String>) -> Self {
        MediaSource::Uri(uri.into())
    }

    pub fn bundled(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        MediaSource::Bundled {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// The retrievable locator, if any. Empty URIs count as absent.
    pub fn locator(&self) -> Option<&str> {
        match self {
            MediaSource::Uri(uri) if !uri.is_empty() => Some(uri),
            _ => None,
        }
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::classify(self.locator())
    }

    /// Filesystem path for plain paths and `file://` URIs
    pub fn local_path(&self) -> Option<PathBuf> {
        let locator = self.locator()?;
        if let Some(path) = locator.strip_prefix("file://") {
            return Some(PathBuf::from(path));
        }
        match scheme(locator) {
            Some(_) => None,
            None => Some(PathBuf::from(locator)),
        }
    }

    /// Whether `other` names the same media
    ///
    /// Identical URIs match. Bundled sources match only when they share the
    /// same buffer.
    pub fn same_as(&self, other: &MediaSource) -> bool {
        match (self, other) {
            (MediaSource::Uri(a), MediaSource::Uri(b)) => !a.is_empty() && a == b,
            (MediaSource::Bundled { bytes: a, .. }, MediaSource::Bundled { bytes: b, .. }) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Uri(uri) => f.debug_tuple("Uri").field(uri).finish(),
            MediaSource::Bundled { name, bytes } => f
                .debug_struct("Bundled")
                .field("name", name)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Uri(uri) => write!(f, "{}", uri),
            MediaSource::Bundled { name, .. } => write!(f, "bundled:{}", name),
        }
    }
}

/// URI scheme, if the locator has one (`https` in `https://...`)
fn scheme(locator: &str) -> Option<&str> {
    let (scheme, _) = locator.split_once("://")?;
    let valid = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Rendering path for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify by locator suffix, ignoring case, query string, and fragment
    ///
    /// Anything that is not a known video suffix, including a missing
    /// locator, is an image.
    pub fn classify(locator: Option<&str>) -> MediaKind {
        let Some(locator) = locator else {
            return MediaKind::Image;
        };
        let path = locator
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let is_video = VIDEO_EXTENSIONS.iter().any(|ext| {
            path.strip_suffix(ext)
                .is_some_and(|stem| stem.len() > 1 && stem.ends_with('.'))
        });
        if is_video {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// Intrinsic pixel dimensions of the media
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    pub fn new(width: u32, height: u32) -> Self {
        NaturalSize { width, height }
    }

    /// Both dimensions are positive
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Payload delivered with load-start and load-complete signals
#[derive(Debug, Clone)]
pub struct LoadEvent {
    pub source: MediaSource,
    pub kind: MediaKind,
    /// Decoded frame size; `None` on load start
    pub size: Option<NaturalSize>,
    /// Frames per second, videos only
    pub frame_rate: Option<f32>,
}

impl LoadEvent {
    pub fn started(source: &MediaSource) -> Self {
        LoadEvent {
            source: source.clone(),
            kind: source.kind(),
            size: None,
            frame_rate: None,
        }
    }
}

/// Progress reported by a media element
#[derive(Debug)]
pub enum MediaSignal {
    LoadStart(LoadEvent),
    Loaded(LoadEvent),
    Failed(LoadError),
}

/// Media decode failure
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("unsupported source: {0}")]
    Unsupported(String),

    #[error("external tool failed: {0}")]
    Tool(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_video_suffixes() {
        assert_eq!(MediaKind::classify(Some("clip.mp4")), MediaKind::Video);
        assert_eq!(
            MediaKind::classify(Some("https://cdn.example.com/a/CLIP.MOV?sig=1#t=3")),
            MediaKind::Video
        );
        assert_eq!(MediaKind::classify(Some("photo.png")), MediaKind::Image);
    }

    #[test]
    fn test_classify_needs_a_real_extension() {
        // No dot before the suffix, or the suffix alone
        assert_eq!(MediaKind::classify(Some("notmp4")), MediaKind::Image);
        assert_eq!(MediaKind::classify(Some("mp4")), MediaKind::Image);
        assert_eq!(MediaKind::classify(Some("clip.mp4.png")), MediaKind::Image);
    }

    #[test]
    fn test_classify_missing_or_malformed_locator() {
        assert_eq!(MediaKind::classify(None), MediaKind::Image);
        assert_eq!(MediaKind::classify(Some("")), MediaKind::Image);
        assert_eq!(MediaKind::classify(Some("?#.mp4")), MediaKind::Image);
    }

    #[test]
    fn test_locator_and_local_path() {
        let plain = MediaSource::uri("/tmp/a.png");
        assert_eq!(plain.local_path(), Some(PathBuf::from("/tmp/a.png")));

        let file = MediaSource::uri("file:///tmp/b.jpg");
        assert_eq!(file.local_path(), Some(PathBuf::from("/tmp/b.jpg")));

        let remote = MediaSource::uri("https://example.com/c.png");
        assert_eq!(remote.locator(), Some("https://example.com/c.png"));
        assert_eq!(remote.local_path(), None);

        let bundled = MediaSource::bundled("logo", vec![1u8, 2, 3]);
        assert_eq!(bundled.locator(), None);
        assert_eq!(bundled.kind(), MediaKind::Image);
        assert_eq!(MediaSource::uri("").locator(), None);
    }

    #[test]
    fn test_same_source() {
        assert!(MediaSource::uri("a.png").same_as(&MediaSource::uri("a.png")));
        assert!(!MediaSource::uri("a.png").same_as(&MediaSource::uri("b.png")));
        assert!(!MediaSource::uri("").same_as(&MediaSource::uri("")));

        let bytes: Arc<[u8]> = Arc::from(vec![0u8; 4]);
        let a = MediaSource::Bundled {
            name: "x".into(),
            bytes: bytes.clone(),
        };
        let b = MediaSource::Bundled {
            name: "y".into(),
            bytes,
        };
        assert!(a.same_as(&b));
        assert!(!a.same_as(&MediaSource::bundled("x", vec![0u8; 4])));
        assert!(!a.same_as(&MediaSource::uri("x")));
    }

    #[test]
    fn test_natural_size_validity() {
        assert!(NaturalSize::new(1, 1).is_valid());
        assert!(!NaturalSize::new(0, 10).is_valid());
    }
}
