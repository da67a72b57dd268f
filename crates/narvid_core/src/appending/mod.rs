//! Video appending: validation, analysis, normalization, and
//! concatenation of independently produced segments.

mod engine;

pub use engine::VideoAppendingEngine;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::media::MediaError;

/// Errors from the appending engine.
///
/// Only per-segment analysis failures are recovered locally (the segment
/// is dropped); every other failure aborts the call.
#[derive(Error, Debug)]
pub enum AppendError {
    /// Malformed input, detected before any external process runs.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No segment survived analysis.
    #[error("Segment analysis failed: {0}")]
    Analysis(String),

    /// A segment could not be normalized to the target format.
    #[error("Normalization failed for segment {index} ('{title}'): {source}")]
    Normalize {
        index: usize,
        title: String,
        #[source]
        source: MediaError,
    },

    /// The concatenation pass failed.
    #[error("Concatenation failed: {0}")]
    Concat(#[from] MediaError),

    /// File I/O around the external tools failed.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// The tool exited cleanly but the output file is missing.
    #[error("concatenation reported success but output was not created: {0}")]
    OutputMissing(PathBuf),
}

impl AppendError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an I/O error with operation context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for engine internals.
pub type AppendResult<T> = Result<T, AppendError>;
