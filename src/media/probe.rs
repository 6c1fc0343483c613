//! Intrinsic size probing

use super::video::ffprobe;
use super::{LoadError, MediaKind, MediaSource, NaturalSize};

/// Size probe failure
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// The platform cannot probe this kind of source
    #[error("probing unsupported: {0}")]
    Unsupported(String),

    #[error("external tool failed: {0}")]
    Tool(String),
}

impl From<ProbeError> for LoadError {
    fn from(e: ProbeError) -> Self {
        match e {
            ProbeError::Io(e) => LoadError::Io(e),
            ProbeError::Decode(e) => LoadError::Decode(e),
            ProbeError::Unsupported(msg) => LoadError::Unsupported(msg),
            ProbeError::Tool(msg) => LoadError::Tool(msg),
        }
    }
}

/// Looks up intrinsic media dimensions from a locator
///
/// Called on a worker thread; implementations may block.
pub trait SizeProbe: Send + Sync {
    fn probe(&self, locator: &str) -> Result<NaturalSize, ProbeError>;
}

/// Probe backed by the `image` crate for pictures and ffprobe for videos
///
/// Pictures must be local (plain path or `file://`). Videos accept anything
/// ffprobe can open.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformProbe;

impl SizeProbe for PlatformProbe {
    fn probe(&self, locator: &str) -> Result<NaturalSize, ProbeError> {
        let source = MediaSource::uri(locator);
        match source.kind() {
            MediaKind::Video => {
                let input = locator.strip_prefix("file://").unwrap_or(locator);
                Ok(ffprobe(input)?.size())
            }
            MediaKind::Image => {
                let path = source.local_path().ok_or_else(|| {
                    ProbeError::Unsupported(format!("no local path for {}", locator))
                })?;
                let (width, height) = image::image_dimensions(&path)?;
                Ok(NaturalSize::new(width, height))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_platform_probe_reads_png_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        ImageBuffer::<Rgb<u8>, _>::from_pixel(40, 10, Rgb([1, 2, 3]))
            .save(&path)
            .unwrap();

        let size = PlatformProbe.probe(path.to_str().unwrap()).unwrap();
        assert_eq!(size, NaturalSize::new(40, 10));

        let uri = format!("file://{}", path.display());
        assert_eq!(PlatformProbe.probe(&uri).unwrap(), NaturalSize::new(40, 10));
    }

    #[test]
    fn test_platform_probe_remote_image_is_unsupported() {
        let err = PlatformProbe
            .probe("https://example.com/a.png")
            .unwrap_err();
        assert!(matches!(err, ProbeError::Unsupported(_)));
    }

    #[test]
    fn test_platform_probe_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        assert!(PlatformProbe.probe(path.to_str().unwrap()).is_err());
    }
}
