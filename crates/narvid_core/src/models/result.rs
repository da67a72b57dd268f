//! Result structs - the output side of the public boundaries.
//!
//! `generate` and `append` never let an error escape; every internal
//! failure is converted into one of these structs with the elapsed
//! processing time up to the failure point.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::enums::GenerationMode;

/// Outcome of a full generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    pub mode: GenerationMode,
    /// Present iff `success`; the file exists on disk.
    pub output_path: Option<PathBuf>,
    /// Wall-clock processing time in seconds, also reported on failure.
    pub processing_time: f64,
    /// Total output duration in seconds (0.0 on failure).
    pub total_duration: f64,
    /// Duration of the avatar part (0.0 when not produced).
    pub avatar_duration: f64,
    /// Duration of the presentation part (0.0 when not produced).
    pub presentation_duration: f64,
    /// Present iff `!success`; prefixed with the failing phase name.
    pub error: Option<String>,
}

impl GenerationResult {
    /// Create a successful result.
    pub fn success(
        mode: GenerationMode,
        output_path: PathBuf,
        total_duration: f64,
        avatar_duration: f64,
        presentation_duration: f64,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: true,
            mode,
            output_path: Some(output_path),
            processing_time: elapsed.as_secs_f64(),
            total_duration,
            avatar_duration,
            presentation_duration,
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failure(mode: GenerationMode, error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            mode,
            output_path: None,
            processing_time: elapsed.as_secs_f64(),
            total_duration: 0.0,
            avatar_duration: 0.0,
            presentation_duration: 0.0,
            error: Some(error.into()),
        }
    }
}

/// Outcome of an append call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAppendResult {
    pub success: bool,
    /// Present iff `success`.
    pub output_path: Option<PathBuf>,
    /// Sum of the original analyzed segment durations in seconds.
    ///
    /// Deliberately the nominal content duration: blend transitions overlap
    /// adjacent segments, so the played runtime can be shorter.
    pub total_duration: f64,
    /// Number of segments that made it into the output.
    pub segments_count: usize,
    /// Wall-clock processing time in seconds, also reported on failure.
    pub processing_time: f64,
    /// Present iff `!success`.
    pub error: Option<String>,
}

impl VideoAppendResult {
    /// Create a successful result.
    pub fn success(
        output_path: PathBuf,
        total_duration: f64,
        segments_count: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: true,
            output_path: Some(output_path),
            total_duration,
            segments_count,
            processing_time: elapsed.as_secs_f64(),
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failure(error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            output_path: None,
            total_duration: 0.0,
            segments_count: 0,
            processing_time: elapsed.as_secs_f64(),
            error: Some(error.into()),
        }
    }
}
