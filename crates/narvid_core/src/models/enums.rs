//! Core enums used throughout the generation pipeline.

use serde::{Deserialize, Serialize};

/// Which recipe a generation request should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Avatar-only talking-head video.
    VideoOnly,
    /// Narrated slide presentation.
    PresentationOnly,
    /// Avatar introduction followed by the narrated presentation.
    VideoPresentation,
}

impl GenerationMode {
    /// Short identifier used in generated file names.
    pub fn slug(&self) -> &'static str {
        match self {
            GenerationMode::VideoOnly => "video",
            GenerationMode::PresentationOnly => "presentation",
            GenerationMode::VideoPresentation => "video_presentation",
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMode::VideoOnly => write!(f, "Video Only"),
            GenerationMode::PresentationOnly => write!(f, "Presentation Only"),
            GenerationMode::VideoPresentation => write!(f, "Video + Presentation"),
        }
    }
}

/// Quality level passed through to the avatar engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    /// Fast, lower-fidelity output for previews.
    Draft,
    #[default]
    Standard,
    /// Slowest, highest-fidelity output.
    High,
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityLevel::Draft => write!(f, "draft"),
            QualityLevel::Standard => write!(f, "standard"),
            QualityLevel::High => write!(f, "high"),
        }
    }
}

/// Transition applied between appended segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    /// Straight cut, no blending. Allows lossless stream-copy concatenation.
    Cut,
    #[default]
    Fade,
    Crossfade,
    Dissolve,
}

impl TransitionType {
    /// The ffmpeg `xfade` transition name, or `None` for a straight cut.
    ///
    /// Fade and crossfade both render as an xfade blend; dissolve uses the
    /// pixel-dissolve variant.
    pub fn xfade_name(&self) -> Option<&'static str> {
        match self {
            TransitionType::Cut => None,
            TransitionType::Fade | TransitionType::Crossfade => Some("fade"),
            TransitionType::Dissolve => Some("dissolve"),
        }
    }
}

impl std::fmt::Display for TransitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionType::Cut => write!(f, "cut"),
            TransitionType::Fade => write!(f, "fade"),
            TransitionType::Crossfade => write!(f, "crossfade"),
            TransitionType::Dissolve => write!(f, "dissolve"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_slugs_are_distinct() {
        assert_eq!(GenerationMode::VideoOnly.slug(), "video");
        assert_eq!(GenerationMode::PresentationOnly.slug(), "presentation");
        assert_eq!(GenerationMode::VideoPresentation.slug(), "video_presentation");
    }

    #[test]
    fn cut_has_no_xfade_name() {
        assert_eq!(TransitionType::Cut.xfade_name(), None);
        assert_eq!(TransitionType::Fade.xfade_name(), Some("fade"));
        assert_eq!(TransitionType::Crossfade.xfade_name(), Some("fade"));
        assert_eq!(TransitionType::Dissolve.xfade_name(), Some("dissolve"));
    }

    #[test]
    fn mode_serializes_snake_case() {
        let json = serde_json::to_string(&GenerationMode::VideoPresentation).unwrap();
        assert_eq!(json, "\"video_presentation\"");
    }
}
