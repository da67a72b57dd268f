//! Media inspection via ffprobe.
//!
//! Parses `ffprobe -print_format json -show_format -show_streams` output
//! into a compact [`MediaInfo`]. Duration comes from the container format
//! with the video stream as fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::runner::{CommandSpec, ProcessRunner};
use super::MediaError;

/// Probed properties of a media file.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    /// Duration in seconds.
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Video codec name (e.g., "h264").
    pub video_codec: String,
    /// Audio codec name, absent for silent clips.
    pub audio_codec: Option<String>,
}

/// Capability for inspecting a media file without altering it.
pub trait MediaProbe: Send + Sync {
    /// Inspect the file, failing within `timeout`.
    fn inspect(&self, path: &Path, timeout: Duration) -> Result<MediaInfo, MediaError>;
}

/// ffprobe-backed probe.
pub struct FfprobeInspector {
    runner: Arc<dyn ProcessRunner>,
    ffprobe_path: Option<PathBuf>,
}

impl FfprobeInspector {
    /// Create an inspector using the given runner.
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            ffprobe_path: None,
        }
    }

    /// Use a specific ffprobe executable instead of searching PATH.
    pub fn with_ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffprobe_path = Some(path.into());
        self
    }

    fn ffprobe_cmd(&self) -> String {
        self.ffprobe_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "ffprobe".to_string())
    }
}

impl MediaProbe for FfprobeInspector {
    fn inspect(&self, path: &Path, timeout: Duration) -> Result<MediaInfo, MediaError> {
        if !path.exists() {
            return Err(MediaError::NotFound {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!("probing file: {}", path.display());

        let spec = CommandSpec::new(
            self.ffprobe_cmd(),
            vec![
                "-v".into(),
                "error".into(),
                "-print_format".into(),
                "json".into(),
                "-show_format".into(),
                "-show_streams".into(),
                path.to_string_lossy().to_string(),
            ],
        );

        let output = self.runner.run(&spec, timeout)?;
        if !output.success() {
            return Err(MediaError::process_failed(
                "ffprobe",
                output.exit_code,
                &output.stderr,
            ));
        }

        parse_probe_output(&output.stdout, path)
    }
}

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_name: Option<String>,
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    /// e.g. "30/1" or "24000/1001"
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Parse ffprobe's JSON into a [`MediaInfo`].
fn parse_probe_output(stdout: &str, path: &Path) -> Result<MediaInfo, MediaError> {
    let parsed: FfprobeOutput = serde_json::from_str(stdout)
        .map_err(|e| MediaError::parse("ffprobe output", e.to_string()))?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            MediaError::parse(
                "ffprobe output",
                format!("no video stream in {}", path.display()),
            )
        })?;

    let audio = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    let width = video.width.ok_or_else(|| {
        MediaError::parse("ffprobe output", "video stream has no width".to_string())
    })?;
    let height = video.height.ok_or_else(|| {
        MediaError::parse("ffprobe output", "video stream has no height".to_string())
    })?;

    let fps = video
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .ok_or_else(|| {
            MediaError::parse("ffprobe output", "video stream has no frame rate".to_string())
        })?;

    let duration = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| {
            MediaError::parse(
                "ffprobe output",
                format!("no duration reported for {}", path.display()),
            )
        })?;

    Ok(MediaInfo {
        duration,
        width,
        height,
        fps,
        video_codec: video.codec_name.clone().unwrap_or_default(),
        audio_codec: audio.and_then(|s| s.codec_name.clone()),
    })
}

/// Parse a frame rate string like "24000/1001" into a float.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let parts: Vec<&str> = rate.split('/').collect();
    if parts.len() == 2 {
        let num: f64 = parts[0].parse().ok()?;
        let den: f64 = parts[1].parse().ok()?;
        if den != 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}
