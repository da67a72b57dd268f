//! Pipeline phases.
//!
//! Every failure is prefixed with the phase that produced it, so an error
//! string always locates the failing stage without a stack trace.

/// A stage of the generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Precondition checks and workspace setup.
    Init,
    /// Resolving the narration script.
    ScriptPrep,
    /// Narration speech synthesis.
    SpeechSynthesis,
    /// Extracting or resolving the avatar reference image.
    ReferenceFrame,
    /// Talking-head synthesis.
    AvatarGeneration,
    /// Downloading or generating the slide deck.
    SlidesAcquire,
    /// Per-slide narration synthesis.
    SlideSpeech,
    /// Rendering slides plus audio into a video.
    SlideRender,
    /// Concatenating the avatar and presentation videos.
    Append,
    /// Moving, probing, and validating the final output.
    Finalize,
}

impl Phase {
    /// Human-readable phase name used in logs and error prefixes.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Init => "Init",
            Phase::ScriptPrep => "Script Preparation",
            Phase::SpeechSynthesis => "Speech Synthesis",
            Phase::ReferenceFrame => "Reference Frame Extraction",
            Phase::AvatarGeneration => "Avatar Generation",
            Phase::SlidesAcquire => "Slides Acquisition",
            Phase::SlideSpeech => "Per-Slide Speech Synthesis",
            Phase::SlideRender => "Slide Rendering",
            Phase::Append => "Append",
            Phase::Finalize => "Finalize",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
