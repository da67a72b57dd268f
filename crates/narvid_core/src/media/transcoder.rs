//! Media transcoding via ffmpeg.
//!
//! The transcoder executes explicit command specifications; the builders
//! below produce the three shapes the appending engine needs: a
//! normalization re-encode, a stream-copy concat, and a one-pass
//! filter-graph encode.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::filter_graph::FilterGraph;
use super::runner::{CommandSpec, ProcessOutput, ProcessRunner};
use super::MediaError;
use crate::models::TargetFormat;

/// Capability for re-encoding or stream-copying media.
pub trait MediaTranscoder: Send + Sync {
    /// Run the command spec, failing within `timeout`. A nonzero exit is
    /// returned as output, not an error; use [`run_expecting_success`] when
    /// a nonzero exit should fail.
    ///
    /// [`run_expecting_success`]: MediaTranscoderExt::run_expecting_success
    fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, MediaError>;
}

/// Convenience over [`MediaTranscoder`] for the common success-required case.
pub trait MediaTranscoderExt: MediaTranscoder {
    /// Run the spec and convert a nonzero exit into
    /// [`MediaError::ProcessFailed`] carrying the stderr tail.
    fn run_expecting_success(
        &self,
        spec: &CommandSpec,
        timeout: Duration,
    ) -> Result<ProcessOutput, MediaError> {
        let output = self.run(spec, timeout)?;
        if !output.success() {
            return Err(MediaError::process_failed(
                &spec.tool,
                output.exit_code,
                &output.stderr,
            ));
        }
        Ok(output)
    }
}

impl<T: MediaTranscoder + ?Sized> MediaTranscoderExt for T {}

/// ffmpeg-backed transcoder.
pub struct FfmpegTranscoder {
    runner: Arc<dyn ProcessRunner>,
    ffmpeg_path: Option<PathBuf>,
}

impl FfmpegTranscoder {
    /// Create a transcoder using the given runner.
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            ffmpeg_path: None,
        }
    }

    /// Use a specific ffmpeg executable instead of searching PATH.
    pub fn with_ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = Some(path.into());
        self
    }

    /// The ffmpeg executable name/path.
    pub fn ffmpeg_cmd(&self) -> String {
        self.ffmpeg_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "ffmpeg".to_string())
    }
}

impl MediaTranscoder for FfmpegTranscoder {
    fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, MediaError> {
        let resolved = CommandSpec::new(self.ffmpeg_cmd(), spec.args.clone());
        tracing::debug!(command = %resolved.display(), "running ffmpeg");
        self.runner.run(&resolved, timeout)
    }
}

// ---------------------------------------------------------------------------
// Command builders
// ---------------------------------------------------------------------------

/// Re-encode `input` to the target format, letterboxed to its aspect.
pub fn normalize_command(input: &Path, output: &Path, target: &TargetFormat) -> CommandSpec {
    let mut args = base_args();
    args.extend([
        "-i".into(),
        input.to_string_lossy().to_string(),
        "-vf".into(),
        target.conform_filter(),
    ]);
    args.extend(encode_args(target));
    args.push(output.to_string_lossy().to_string());
    CommandSpec::new("ffmpeg", args)
}

/// Concatenate the files listed in `list_file` without re-encoding.
///
/// Valid only when all inputs share identical codec parameters, which
/// normalization guarantees.
pub fn concat_copy_command(list_file: &Path, output: &Path) -> CommandSpec {
    let mut args = base_args();
    args.extend([
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        list_file.to_string_lossy().to_string(),
        "-c".into(),
        "copy".into(),
        "-movflags".into(),
        "+faststart".into(),
        output.to_string_lossy().to_string(),
    ]);
    CommandSpec::new("ffmpeg", args)
}

/// One encode pass over all inputs through a filter graph.
///
/// The graph is expected to expose labeled `video_out`/`audio_out` pads.
pub fn filter_graph_command(
    inputs: &[PathBuf],
    graph: &FilterGraph,
    video_out: &str,
    audio_out: &str,
    output: &Path,
    target: &TargetFormat,
) -> CommandSpec {
    let mut args = base_args();
    for input in inputs {
        args.extend(["-i".into(), input.to_string_lossy().to_string()]);
    }
    args.extend([
        "-filter_complex".into(),
        graph.render(),
        "-map".into(),
        format!("[{video_out}]"),
        "-map".into(),
        format!("[{audio_out}]"),
    ]);
    args.extend(encode_args(target));
    args.push(output.to_string_lossy().to_string());
    CommandSpec::new("ffmpeg", args)
}

/// One line of a concat-demuxer manifest, with single quotes escaped the
/// way the demuxer expects.
pub fn concat_list_entry(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', r"'\''");
    format!("file '{escaped}'\n")
}

/// Common leading arguments for every ffmpeg invocation.
fn base_args() -> Vec<String> {
    vec!["-hide_banner".into(), "-y".into()]
}

/// Encoder arguments for the target format.
fn encode_args(target: &TargetFormat) -> Vec<String> {
    vec![
        "-c:v".into(),
        target.video_codec.clone(),
        "-preset".into(),
        target.preset.clone(),
        "-crf".into(),
        target.crf.to_string(),
        "-r".into(),
        target.fps.to_string(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-c:a".into(),
        target.audio_codec.clone(),
        "-b:a".into(),
        target.audio_bitrate.clone(),
        "-ar".into(),
        "48000".into(),
        "-movflags".into(),
        "+faststart".into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_command_conforms_and_encodes() {
        let spec = normalize_command(
            Path::new("/in/a.mp4"),
            Path::new("/work/normalized_01.mp4"),
            &TargetFormat::default(),
        );
        assert_eq!(spec.tool, "ffmpeg");
        let joined = spec.args.join(" ");
        assert!(joined.contains("-vf"));
        assert!(joined.contains("scale=1280:720"));
        assert!(joined.contains("fps=30"));
        assert!(joined.contains("-c:v libx264"));
        assert!(joined.contains("-c:a aac"));
        assert!(joined.contains("+faststart"));
        assert!(joined.ends_with("/work/normalized_01.mp4"));
    }

    #[test]
    fn concat_copy_command_never_re_encodes() {
        let spec = concat_copy_command(Path::new("/work/concat.txt"), Path::new("/out/final.mp4"));
        let joined = spec.args.join(" ");
        assert!(joined.contains("-f concat"));
        assert!(joined.contains("-safe 0"));
        assert!(joined.contains("-c copy"));
        assert!(!joined.contains("-c:v"));
    }

    #[test]
    fn concat_list_entries_escape_quotes() {
        assert_eq!(
            concat_list_entry(Path::new("/work/normalized_01.mp4")),
            "file '/work/normalized_01.mp4'\n"
        );
        assert_eq!(
            concat_list_entry(Path::new("/work/it's.mp4")),
            "file '/work/it'\\''s.mp4'\n"
        );
    }

    #[test]
    fn filter_graph_command_maps_labeled_pads() {
        let mut graph = FilterGraph::new();
        graph.chain(vec!["0:v".into()], vec!["null".into()], "outv".into());
        let spec = filter_graph_command(
            &[PathBuf::from("/in/a.mp4"), PathBuf::from("/in/b.mp4")],
            &graph,
            "outv",
            "outa",
            Path::new("/out/final.mp4"),
            &TargetFormat::default(),
        );
        let joined = spec.args.join(" ");
        assert_eq!(joined.matches("-i ").count(), 2);
        assert!(joined.contains("-filter_complex"));
        assert!(joined.contains("-map [outv]"));
        assert!(joined.contains("-map [outa]"));
    }
}
