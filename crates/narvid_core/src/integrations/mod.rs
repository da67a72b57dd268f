//! Collaborator interfaces consumed by the orchestrator.
//!
//! The orchestrator treats speech synthesis, content processing, avatar
//! synthesis, slide acquisition, and slide rendering as external
//! collaborators behind these traits. Implementations report failure as
//! structured results; nothing panics across this boundary.

mod avatar;
mod content;
mod slides;
mod voice;

pub use avatar::{AvatarEngine, AvatarVideo};
pub use content::ContentProcessor;
pub use slides::{RenderedPresentation, Slide, SlideDeck, SlidesProcessor, SlidesToVideoRenderer};
pub use voice::{VoiceProfile, VoiceProfileManager};

use thiserror::Error;

/// Failure reported by a collaborator sub-pipeline.
///
/// Carries only the collaborator's message; the orchestrator adds phase
/// context when propagating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct IntegrationError(pub String);

impl IntegrationError {
    /// Create an integration error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for IntegrationError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for IntegrationError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integration_error_displays_message() {
        let err = IntegrationError::new("avatar backend unreachable");
        assert_eq!(err.to_string(), "avatar backend unreachable");
    }
}
