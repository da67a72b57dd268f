//! Slide deck acquisition and presentation rendering.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::IntegrationError;

/// One slide of a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Position within the deck, 1-based.
    pub index: usize,
    /// Rendered slide image.
    pub image_path: PathBuf,
    /// Speaker notes used as narration; slides without notes are skipped.
    #[serde(default)]
    pub notes: Option<String>,
    /// Optional slide title.
    #[serde(default)]
    pub title: Option<String>,
}

impl Slide {
    /// The narration text for this slide, if it has any.
    pub fn narration(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// A deck of slides in presentation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
}

/// Acquires slide decks from a remote deck URL or by generating a new deck.
pub trait SlidesProcessor: Send + Sync {
    /// Whether the deck at `url` is reachable with current credentials.
    fn validate_access(&self, url: &str) -> bool;

    /// Download and rasterize the deck at `url` into `out_dir`.
    fn process_url(&self, url: &str, out_dir: &Path) -> Result<SlideDeck, IntegrationError>;

    /// Author a fresh deck from a narration script into `out_dir`.
    fn generate_deck(&self, script: &str, out_dir: &Path)
        -> Result<SlideDeck, IntegrationError>;
}

/// Result of rendering a narrated presentation video.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPresentation {
    pub output_path: PathBuf,
    /// Total duration in seconds.
    pub total_duration: f64,
}

/// Renders slides plus per-slide narration audio into one video.
pub trait SlidesToVideoRenderer: Send + Sync {
    /// Render `slides` with their parallel `audio_files` into `out_path`.
    ///
    /// The two lists have equal length; callers pass only narrated slides.
    fn render(
        &self,
        slides: &[Slide],
        audio_files: &[PathBuf],
        out_path: &Path,
    ) -> Result<RenderedPresentation, IntegrationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narration_requires_non_blank_notes() {
        let mut slide = Slide {
            index: 1,
            image_path: PathBuf::from("/slides/1.png"),
            notes: None,
            title: None,
        };
        assert_eq!(slide.narration(), None);

        slide.notes = Some("   ".to_string());
        assert_eq!(slide.narration(), None);

        slide.notes = Some("  Welcome to the demo.  ".to_string());
        assert_eq!(slide.narration(), Some("Welcome to the demo."));
    }
}
