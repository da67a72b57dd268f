//! Voice profile lookup and speech synthesis.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::IntegrationError;

/// A named voice available for synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Profile name requests refer to.
    pub name: String,
    /// Backend voice identifier.
    pub voice_id: String,
    /// Optional language tag (e.g., "en-US").
    #[serde(default)]
    pub language: Option<String>,
}

/// Manages voice profiles and turns text into narration audio.
pub trait VoiceProfileManager: Send + Sync {
    /// Look up a profile by name.
    fn get_profile(&self, name: &str) -> Option<VoiceProfile>;

    /// Synthesize `text` with the named profile into `out_path`.
    fn generate_speech(
        &self,
        text: &str,
        profile_name: &str,
        out_path: &Path,
    ) -> Result<(), IntegrationError>;
}
