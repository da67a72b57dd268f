//! Avatar synthesis: talking-head video driven by audio and a reference
//! face image.

use std::path::{Path, PathBuf};

use super::IntegrationError;
use crate::models::QualityLevel;

/// Result of a successful avatar synthesis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarVideo {
    /// The produced video file.
    pub output_path: PathBuf,
    /// Backend-reported processing time in seconds.
    pub processing_time: f64,
}

/// Synthesizes talking-head video.
pub trait AvatarEngine: Send + Sync {
    /// Extract a still frame from `video_path` into `out_image` for use as
    /// the avatar likeness.
    fn extract_reference_frame(
        &self,
        video_path: &Path,
        out_image: &Path,
    ) -> Result<(), IntegrationError>;

    /// Generate an avatar video from narration audio and a reference image,
    /// writing artifacts under `out_dir`.
    fn generate_avatar_video(
        &self,
        audio_path: &Path,
        reference_image: &Path,
        out_dir: &Path,
        quality: QualityLevel,
    ) -> Result<AvatarVideo, IntegrationError>;
}
