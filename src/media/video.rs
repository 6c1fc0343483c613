//! Video geometry and frame streaming through ffprobe/ffmpeg

use super::{LoadError, LoadEvent, MediaSource, NaturalSize};
use super::probe::ProbeError;
use image::RgbImage;
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc::SyncSender;

/// Fallback when the stream does not report a usable frame rate
const DEFAULT_FPS: f32 = 30.0;

/// First video stream geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f32,
}

impl VideoInfo {
    pub fn size(&self) -> NaturalSize {
        NaturalSize::new(self.width, self.height)
    }
}

/// Parse `ffprobe -show_entries stream=width,height,r_frame_rate -of csv=p=0`
///
/// Expects `width,height,rate` where rate is `num/den` or a plain number.
pub fn parse_ffprobe_stream(output: &str) -> Option<VideoInfo> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let mut parts = line.trim().split(',');
    let width: u32 = parts.next()?.trim().parse().ok()?;
    let height: u32 = parts.next()?.trim().parse().ok()?;
    let fps = parts
        .next()
        .and_then(parse_frame_rate)
        .unwrap_or(DEFAULT_FPS);
    Some(VideoInfo { width, height, fps })
}

fn parse_frame_rate(rate: &str) -> Option<f32> {
    let rate = rate.trim();
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let n: f32 = num.parse().ok()?;
            let d: f32 = den.parse().ok()?;
            if d == 0.0 {
                return None;
            }
            n / d
        }
        None => rate.parse().ok()?,
    };
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Ask ffprobe for the first video stream's geometry
pub(crate) fn ffprobe(input: &str) -> Result<VideoInfo, ProbeError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "csv=p=0",
            input,
        ])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ProbeError::Unsupported("ffprobe not found".into()),
            _ => ProbeError::Io(e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProbeError::Tool(format!("ffprobe: {}", stderr.trim())));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_ffprobe_stream(&stdout)
        .ok_or_else(|| ProbeError::Tool(format!("unexpected ffprobe output: {:?}", stdout.trim())))
}

/// Messages from a decode worker
pub(crate) enum Decoded {
    Loaded(LoadEvent, RgbImage),
    Frame(RgbImage),
    Failed(LoadError),
}

/// Decode `input` forever, looping at end of stream, until the receiver is dropped
///
/// Audio is never decoded. The bounded channel paces decoding to playback.
pub(crate) fn stream_frames(source: MediaSource, input: String, tx: SyncSender<Decoded>) {
    let info = match ffprobe(&input) {
        Ok(info) => info,
        Err(e) => {
            let _ = tx.send(Decoded::Failed(e.into()));
            return;
        }
    };
    let frame_len = info.width as usize * info.height as usize * 3;
    if frame_len == 0 {
        let _ = tx.send(Decoded::Failed(LoadError::Tool("video has no frame size".into())));
        return;
    }

    let mut loaded = false;
    loop {
        let mut child = match Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i", &input, "-an"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                let _ = tx.send(Decoded::Failed(LoadError::Tool(format!("ffmpeg: {}", e))));
                return;
            }
        };

        let Some(mut stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return;
        };

        let mut produced = 0usize;
        loop {
            let mut buf = vec![0u8; frame_len];
            if stdout.read_exact(&mut buf).is_err() {
                break;
            }
            let Some(frame) = RgbImage::from_raw(info.width, info.height, buf) else {
                break;
            };

            let msg = if loaded {
                Decoded::Frame(frame)
            } else {
                loaded = true;
                let event = LoadEvent {
                    source: source.clone(),
                    kind: source.kind(),
                    size: Some(info.size()),
                    frame_rate: Some(info.fps),
                };
                Decoded::Loaded(event, frame)
            };

            if tx.send(msg).is_err() {
                // Element dropped
                let _ = child.kill();
                let _ = child.wait();
                return;
            }
            produced += 1;
        }

        let _ = child.wait();
        if produced == 0 {
            if !loaded {
                let _ = tx.send(Decoded::Failed(LoadError::Tool("no frames decoded".into())));
            }
            return;
        }
    }
}
