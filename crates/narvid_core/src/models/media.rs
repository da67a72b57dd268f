//! Media-related data structures (segments, transitions, target format).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::enums::TransitionType;
use crate::media::MediaInfo;

/// Tolerance when comparing probed frame rates against the target.
///
/// Tight enough that NTSC rates (29.97) still get conformed to an exact 30.
const FPS_TOLERANCE: f64 = 0.01;

/// One input clip to be concatenated.
///
/// `duration`, `resolution`, and `fps` are unset until the segment has been
/// analyzed by a probe. A segment is never mutated after analysis; the
/// appending engine replaces it with a new value when normalization produces
/// a temp copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSegment {
    /// Path to the clip. Borrowed by the engine, never mutated or deleted.
    pub path: PathBuf,
    /// Diagnostic label (e.g., "Avatar Introduction").
    pub title: String,
    /// Duration in seconds, populated by analysis.
    pub duration: Option<f64>,
    /// (width, height) in pixels, populated by analysis.
    pub resolution: Option<(u32, u32)>,
    /// Frames per second, populated by analysis.
    pub fps: Option<f64>,
}

impl VideoSegment {
    /// Create an unanalyzed segment.
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            duration: None,
            resolution: None,
            fps: None,
        }
    }

    /// Whether analysis has populated the media properties.
    pub fn is_analyzed(&self) -> bool {
        self.duration.is_some() && self.resolution.is_some() && self.fps.is_some()
    }

    /// A new segment carrying the probed media properties.
    pub fn analyzed(&self, info: &MediaInfo) -> Self {
        Self {
            path: self.path.clone(),
            title: self.title.clone(),
            duration: Some(info.duration),
            resolution: Some((info.width, info.height)),
            fps: Some(info.fps),
        }
    }

    /// A new segment pointing at a normalized temp copy.
    ///
    /// The original analyzed duration is kept; resolution and frame rate
    /// take the target values.
    pub fn normalized(&self, path: impl Into<PathBuf>, target: &TargetFormat) -> Self {
        Self {
            path: path.into(),
            title: self.title.clone(),
            duration: self.duration,
            resolution: Some((target.width, target.height)),
            fps: Some(target.fps as f64),
        }
    }

    /// Whether this analyzed segment already conforms to the target format.
    ///
    /// Unanalyzed segments never match.
    pub fn matches_target(&self, target: &TargetFormat) -> bool {
        let Some((w, h)) = self.resolution else {
            return false;
        };
        let Some(fps) = self.fps else {
            return false;
        };
        w == target.width && h == target.height && (fps - target.fps as f64).abs() < FPS_TOLERANCE
    }
}

/// How adjacent segments are joined during appending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSettings {
    /// Transition style.
    #[serde(default, rename = "type")]
    pub transition_type: TransitionType,
    /// Transition duration in seconds.
    #[serde(default = "default_transition_duration")]
    pub duration: f64,
    /// Disabled transitions behave like a cut.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_transition_duration() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            transition_type: TransitionType::Fade,
            duration: default_transition_duration(),
            enabled: true,
        }
    }
}

impl TransitionSettings {
    /// Whether appending must go through a filter-graph encode.
    ///
    /// Disabled transitions and straight cuts allow stream-copy
    /// concatenation instead.
    pub fn requires_blend(&self) -> bool {
        self.enabled && self.transition_type.xfade_name().is_some()
    }
}

/// Uniform format all segments are normalized to before concatenation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetFormat {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// ffmpeg video encoder name.
    pub video_codec: String,
    /// ffmpeg audio encoder name.
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub preset: String,
    pub crf: u32,
}

impl Default for TargetFormat {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            preset: "medium".to_string(),
            crf: 23,
        }
    }
}

impl TargetFormat {
    /// The scale/pad/rate video filter that converts any input to this
    /// format while preserving aspect ratio (letterboxed to 16:9).
    pub fn conform_filter(&self) -> String {
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,\
             pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={fps}",
            w = self.width,
            h = self.height,
            fps = self.fps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(width: u32, height: u32, fps: f64, duration: f64) -> MediaInfo {
        MediaInfo {
            duration,
            width,
            height,
            fps,
            video_codec: "h264".to_string(),
            audio_codec: Some("aac".to_string()),
        }
    }

    #[test]
    fn default_transition_is_one_second_fade() {
        let t = TransitionSettings::default();
        assert_eq!(t.transition_type, TransitionType::Fade);
        assert_eq!(t.duration, 1.0);
        assert!(t.enabled);
        assert!(t.requires_blend());
    }

    #[test]
    fn disabled_transition_does_not_blend() {
        let t = TransitionSettings {
            enabled: false,
            ..Default::default()
        };
        assert!(!t.requires_blend());

        let cut = TransitionSettings {
            transition_type: TransitionType::Cut,
            ..Default::default()
        };
        assert!(!cut.requires_blend());
    }

    #[test]
    fn unanalyzed_segment_never_matches() {
        let seg = VideoSegment::new("/tmp/a.mp4", "A");
        assert!(!seg.is_analyzed());
        assert!(!seg.matches_target(&TargetFormat::default()));
    }

    #[test]
    fn conforming_segment_matches_target() {
        let seg = VideoSegment::new("/tmp/a.mp4", "A").analyzed(&info(1280, 720, 30.0, 5.0));
        assert!(seg.is_analyzed());
        assert!(seg.matches_target(&TargetFormat::default()));

        let near = VideoSegment::new("/tmp/b.mp4", "B").analyzed(&info(1280, 720, 29.97, 5.0));
        assert!(!near.matches_target(&TargetFormat::default()));
    }

    #[test]
    fn normalized_copy_keeps_original_duration() {
        let target = TargetFormat::default();
        let seg = VideoSegment::new("/tmp/a.mp4", "A").analyzed(&info(640, 480, 24.0, 7.5));
        let norm = seg.normalized("/tmp/work/normalized_01.mp4", &target);

        assert_eq!(norm.duration, Some(7.5));
        assert_eq!(norm.resolution, Some((1280, 720)));
        assert_eq!(norm.fps, Some(30.0));
        assert_eq!(norm.title, "A");
        // The original is untouched.
        assert_eq!(seg.path, PathBuf::from("/tmp/a.mp4"));
    }

    #[test]
    fn conform_filter_matches_target() {
        let filter = TargetFormat::default().conform_filter();
        assert!(filter.contains("scale=1280:720"));
        assert!(filter.contains("pad=1280:720"));
        assert!(filter.contains("fps=30"));
    }
}
