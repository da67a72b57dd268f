//! Generation request - the input side of the public boundary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::enums::{GenerationMode, QualityLevel};
use super::media::TransitionSettings;

/// A request to generate a narrated video.
///
/// The narration source is `content_text` XOR `content_file`; when both are
/// set the text takes precedence. For the presentation modes exactly one of
/// `slides_url` / `generate_new_slides` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Which recipe to produce.
    pub mode: GenerationMode,
    /// Name of the voice profile used for all speech synthesis.
    pub voice_profile: String,
    /// Avatar synthesis quality.
    #[serde(default)]
    pub quality: QualityLevel,
    /// Narration script text.
    #[serde(default)]
    pub content_text: Option<String>,
    /// File to derive the narration script from.
    #[serde(default)]
    pub content_file: Option<PathBuf>,
    /// Source video for the avatar likeness. When absent the configured
    /// default avatar image is used.
    #[serde(default)]
    pub reference_video: Option<PathBuf>,
    /// URL of an existing slide deck.
    #[serde(default)]
    pub slides_url: Option<String>,
    /// Generate a fresh deck from the narration script instead.
    #[serde(default)]
    pub generate_new_slides: bool,
    /// Final output file. Generated under the configured output folder
    /// when absent.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    /// Root for the per-generation working directory. Falls back to the
    /// configured temp root.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    /// Transition between the avatar and presentation parts in combined
    /// mode. Defaults to a 1 s fade.
    #[serde(default)]
    pub transitions: Option<TransitionSettings>,
}

impl GenerationRequest {
    /// Create a request with only the required fields set.
    pub fn new(mode: GenerationMode, voice_profile: impl Into<String>) -> Self {
        Self {
            mode,
            voice_profile: voice_profile.into(),
            quality: QualityLevel::default(),
            content_text: None,
            content_file: None,
            reference_video: None,
            slides_url: None,
            generate_new_slides: false,
            output_path: None,
            temp_dir: None,
            transitions: None,
        }
    }

    pub fn with_content_text(mut self, text: impl Into<String>) -> Self {
        self.content_text = Some(text.into());
        self
    }

    pub fn with_content_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.content_file = Some(path.into());
        self
    }

    pub fn with_reference_video(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference_video = Some(path.into());
        self
    }

    pub fn with_slides_url(mut self, url: impl Into<String>) -> Self {
        self.slides_url = Some(url.into());
        self
    }

    pub fn with_new_slides(mut self) -> Self {
        self.generate_new_slides = true;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_temp_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(path.into());
        self
    }

    pub fn with_quality(mut self, quality: QualityLevel) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_transitions(mut self, transitions: TransitionSettings) -> Self {
        self.transitions = Some(transitions);
        self
    }

    /// Whether this request needs the presentation sub-pipeline.
    pub fn needs_presentation(&self) -> bool {
        matches!(
            self.mode,
            GenerationMode::PresentationOnly | GenerationMode::VideoPresentation
        )
    }

    /// Whether exactly one presentation source is set.
    pub fn has_single_presentation_source(&self) -> bool {
        self.slides_url.is_some() != self.generate_new_slides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let req = GenerationRequest::new(GenerationMode::VideoOnly, "narrator")
            .with_content_text("Hello")
            .with_quality(QualityLevel::High);

        assert_eq!(req.voice_profile, "narrator");
        assert_eq!(req.content_text.as_deref(), Some("Hello"));
        assert_eq!(req.quality, QualityLevel::High);
        assert!(!req.needs_presentation());
    }

    #[test]
    fn presentation_source_must_be_exclusive() {
        let neither = GenerationRequest::new(GenerationMode::PresentationOnly, "n");
        assert!(!neither.has_single_presentation_source());

        let url = neither.clone().with_slides_url("https://docs.example/deck");
        assert!(url.has_single_presentation_source());

        let both = url.with_new_slides();
        assert!(!both.has_single_presentation_source());
    }

    #[test]
    fn request_round_trips_through_json() {
        let req = GenerationRequest::new(GenerationMode::VideoPresentation, "host")
            .with_content_text("Welcome")
            .with_slides_url("https://docs.example/deck");
        let json = serde_json::to_string(&req).unwrap();
        let back: GenerationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mode, GenerationMode::VideoPresentation);
        assert_eq!(back.slides_url.as_deref(), Some("https://docs.example/deck"));
    }
}
