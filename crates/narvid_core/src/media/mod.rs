//! External media tooling: process execution, probing, transcoding, and
//! filter-graph construction.
//!
//! Everything that touches ffmpeg/ffprobe lives behind the capability
//! traits in this module so the engine and orchestrator can be verified
//! without real media binaries.

mod filter_graph;
mod probe;
mod runner;
mod transcoder;
mod workdir;

pub use filter_graph::{FilterChain, FilterGraph, TransitionGraphBuilder, AUDIO_OUT, VIDEO_OUT};
pub use probe::{FfprobeInspector, MediaInfo, MediaProbe};
pub use runner::{CommandSpec, ProcessOutput, ProcessRunner, SystemRunner};
pub use transcoder::{
    concat_copy_command, concat_list_entry, filter_graph_command, normalize_command,
    FfmpegTranscoder, MediaTranscoder, MediaTranscoderExt,
};
pub use workdir::WorkDir;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from probing and transcoding media.
#[derive(Error, Debug)]
pub enum MediaError {
    /// The tool did not finish within its allotted budget.
    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    /// The tool exited nonzero; carries the captured diagnostic output.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    ProcessFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// The tool could not be spawned at all.
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// A media file to inspect was missing.
    #[error("media file not found: {path}")]
    NotFound { path: PathBuf },

    /// The tool's output could not be interpreted.
    #[error("failed to parse {what}: {message}")]
    Parse { what: String, message: String },
}

impl MediaError {
    /// Create a timeout error.
    pub fn timeout(tool: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            tool: tool.into(),
            seconds,
        }
    }

    /// Create a process failure error, keeping only the tail of stderr.
    pub fn process_failed(tool: impl Into<String>, exit_code: i32, stderr: &str) -> Self {
        Self::ProcessFailed {
            tool: tool.into(),
            exit_code,
            message: tail_of(stderr, 12),
        }
    }

    /// Create a parse error.
    pub fn parse(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.into(),
        }
    }
}

/// Last `lines` lines of a tool's output, joined for a diagnostic message.
fn tail_of(output: &str, lines: usize) -> String {
    let all: Vec<&str> = output.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_failed_keeps_stderr_tail() {
        let stderr: String = (0..30).map(|i| format!("line {i}\n")).collect();
        let err = MediaError::process_failed("ffmpeg", 1, &stderr);
        let msg = err.to_string();
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("line 29"));
        assert!(!msg.contains("line 0\n"));
    }

    #[test]
    fn timeout_is_distinct_from_process_failure() {
        let timeout = MediaError::timeout("ffprobe", 30);
        assert!(timeout.to_string().contains("timed out after 30s"));
        assert!(matches!(timeout, MediaError::Timeout { .. }));
    }
}
