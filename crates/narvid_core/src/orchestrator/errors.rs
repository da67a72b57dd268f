//! Error types for the generation pipeline.
//!
//! Every variant carries the phase that produced it; the phase name
//! prefixes the rendered message, which is what ends up in
//! `GenerationResult::error`.

use std::io;

use thiserror::Error;

use super::phase::Phase;
use crate::integrations::IntegrationError;
use crate::media::MediaError;

/// A failure inside a generation run.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Malformed or missing input, detected before expensive work.
    #[error("{phase}: {message}")]
    Validation { phase: Phase, message: String },

    /// A collaborator sub-pipeline reported failure.
    #[error("{phase}: {message}")]
    Integration { phase: Phase, message: String },

    /// Probing or transcoding failed.
    #[error("{phase}: {source}")]
    Media {
        phase: Phase,
        #[source]
        source: MediaError,
    },

    /// File I/O around the pipeline failed.
    #[error("{phase}: I/O error in {operation}: {source}")]
    Io {
        phase: Phase,
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl GenerationError {
    /// Create a validation error.
    pub fn validation(phase: Phase, message: impl Into<String>) -> Self {
        Self::Validation {
            phase,
            message: message.into(),
        }
    }

    /// Create an integration error from a collaborator failure.
    pub fn integration(phase: Phase, error: impl Into<IntegrationError>) -> Self {
        Self::Integration {
            phase,
            message: error.into().0,
        }
    }

    /// Create a media error.
    pub fn media(phase: Phase, source: MediaError) -> Self {
        Self::Media { phase, source }
    }

    /// Create an I/O error with operation context.
    pub fn io(phase: Phase, operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            phase,
            operation: operation.into(),
            source,
        }
    }

    /// The phase this error occurred in.
    pub fn phase(&self) -> Phase {
        match self {
            GenerationError::Validation { phase, .. }
            | GenerationError::Integration { phase, .. }
            | GenerationError::Media { phase, .. }
            | GenerationError::Io { phase, .. } => *phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_phase_prefixed() {
        let err = GenerationError::validation(Phase::Init, "voice profile 'host' not found");
        assert_eq!(err.to_string(), "Init: voice profile 'host' not found");

        let err = GenerationError::integration(Phase::SlideSpeech, "backend refused");
        assert!(err.to_string().starts_with("Per-Slide Speech Synthesis:"));

        let err = GenerationError::media(Phase::Finalize, MediaError::timeout("ffprobe", 30));
        assert_eq!(err.to_string(), "Finalize: ffprobe timed out after 30s");
        assert_eq!(err.phase(), Phase::Finalize);
    }
}
