//! Shared orchestrator types.

use std::path::PathBuf;
use std::sync::Arc;

use crate::integrations::{
    AvatarEngine, ContentProcessor, SlidesProcessor, SlidesToVideoRenderer, VoiceProfileManager,
};
use crate::media::{MediaProbe, MediaTranscoder};

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (phase_name, percent_complete, message)
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// The external collaborators a [`ModeOrchestrator`] drives.
///
/// [`ModeOrchestrator`]: super::ModeOrchestrator
pub struct Collaborators {
    pub voice: Arc<dyn VoiceProfileManager>,
    pub content: Arc<dyn ContentProcessor>,
    pub avatar: Arc<dyn AvatarEngine>,
    pub slides: Arc<dyn SlidesProcessor>,
    pub renderer: Arc<dyn SlidesToVideoRenderer>,
    pub probe: Arc<dyn MediaProbe>,
    pub transcoder: Arc<dyn MediaTranscoder>,
}

/// What a mode handler produced.
#[derive(Debug, Clone)]
pub(crate) struct ModeOutcome {
    /// The finished video for this handler.
    pub output_path: PathBuf,
    /// Total duration in seconds.
    pub total_duration: f64,
    /// Duration of the avatar part (0.0 when none).
    pub avatar_duration: f64,
    /// Duration of the presentation part (0.0 when none).
    pub presentation_duration: f64,
}
