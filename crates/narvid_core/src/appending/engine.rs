//! The video appending engine.
//!
//! Appending runs as an ordered sequence - validate, analyze, normalize,
//! concatenate - where every step's failure aborts the later ones. The
//! single exception is per-segment analysis, which drops unreadable
//! segments with a warning as long as at least one survives.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{AppendError, AppendResult};
use crate::config::Settings;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::media::{
    concat_copy_command, concat_list_entry, filter_graph_command, normalize_command, MediaProbe,
    MediaTranscoder, MediaTranscoderExt, TransitionGraphBuilder, WorkDir, AUDIO_OUT, VIDEO_OUT,
};
use crate::models::{TargetFormat, TransitionSettings, VideoAppendResult, VideoSegment};

/// Stitches an ordered list of video segments into one output file.
///
/// The engine holds only immutable configuration and shared collaborators,
/// so independent `append` calls may run concurrently; each call works in
/// its own uuid-scoped temp directory, removed on every exit path.
pub struct VideoAppendingEngine {
    probe: Arc<dyn MediaProbe>,
    transcoder: Arc<dyn MediaTranscoder>,
    ids: Arc<dyn IdGenerator>,
    temp_root: PathBuf,
    target: TargetFormat,
    probe_timeout: Duration,
    transcode_timeout: Duration,
}

impl VideoAppendingEngine {
    /// Create an engine from settings and media collaborators.
    pub fn new(
        settings: &Settings,
        probe: Arc<dyn MediaProbe>,
        transcoder: Arc<dyn MediaTranscoder>,
    ) -> Self {
        Self {
            probe,
            transcoder,
            ids: Arc::new(UuidGenerator),
            temp_root: PathBuf::from(&settings.paths.temp_root),
            target: settings.media.target_format(),
            probe_timeout: settings.media.probe_timeout(),
            transcode_timeout: settings.media.transcode_timeout(),
        }
    }

    /// Replace the ID generator (deterministic IDs for tests).
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// The normalization target this engine enforces.
    pub fn target_format(&self) -> &TargetFormat {
        &self.target
    }

    /// Append `segments` in order into `output_path`.
    ///
    /// Input segment paths are borrowed and never mutated or deleted; only
    /// engine-created normalized copies are engine-owned artifacts. Never
    /// panics or returns an error across this boundary - all failure comes
    /// back as `VideoAppendResult { success: false, .. }` with the elapsed
    /// processing time.
    pub fn append(
        &self,
        segments: &[VideoSegment],
        output_path: &Path,
        transitions: Option<&TransitionSettings>,
        normalize_format: bool,
    ) -> VideoAppendResult {
        let started = Instant::now();
        match self.run(segments, output_path, transitions, normalize_format) {
            Ok((total_duration, segments_count)) => {
                tracing::info!(
                    output = %output_path.display(),
                    total_duration,
                    segments_count,
                    "append completed"
                );
                VideoAppendResult::success(
                    output_path.to_path_buf(),
                    total_duration,
                    segments_count,
                    started.elapsed(),
                )
            }
            Err(err) => {
                tracing::error!(error = %err, "append failed");
                VideoAppendResult::failure(err.to_string(), started.elapsed())
            }
        }
    }

    fn run(
        &self,
        segments: &[VideoSegment],
        output_path: &Path,
        transitions: Option<&TransitionSettings>,
        normalize_format: bool,
    ) -> AppendResult<(f64, usize)> {
        self.validate(segments)?;

        // Owned for the whole call; the drop guard removes it whether we
        // return Ok or Err.
        let work = WorkDir::create(&self.temp_root, &format!("append_{}", self.ids.generate()))
            .map_err(|e| AppendError::io("creating append work directory", e))?;

        let analyzed = self.analyze(segments)?;
        let total_duration: f64 = analyzed.iter().filter_map(|s| s.duration).sum();
        let segments_count = analyzed.len();

        let inputs = if normalize_format {
            self.normalize(&analyzed, &work)?
        } else {
            analyzed
        };

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppendError::io("creating output directory", e))?;
        }

        let blend = transitions
            .filter(|t| t.requires_blend())
            .filter(|_| inputs.len() >= 2);
        match blend {
            Some(t) => self.concat_with_transitions(&inputs, t, output_path)?,
            None => self.concat_stream_copy(&inputs, &work, output_path)?,
        }

        if !output_path.exists() {
            return Err(AppendError::OutputMissing(output_path.to_path_buf()));
        }

        Ok((total_duration, segments_count))
    }

    /// Step 1: structural checks, before any external process runs.
    fn validate(&self, segments: &[VideoSegment]) -> AppendResult<()> {
        if segments.is_empty() {
            return Err(AppendError::validation(
                "No video segments provided for appending",
            ));
        }

        for (i, segment) in segments.iter().enumerate() {
            if !segment.path.exists() {
                return Err(AppendError::validation(format!(
                    "Segment {} not found: {}",
                    i + 1,
                    segment.path.display()
                )));
            }
        }

        Ok(())
    }

    /// Step 2: probe every segment. Unreadable segments are dropped with a
    /// warning; losing all of them aborts.
    fn analyze(&self, segments: &[VideoSegment]) -> AppendResult<Vec<VideoSegment>> {
        let mut analyzed = Vec::with_capacity(segments.len());

        for (i, segment) in segments.iter().enumerate() {
            match self.probe.inspect(&segment.path, self.probe_timeout) {
                Ok(info) => {
                    tracing::debug!(
                        segment = %segment.title,
                        duration = info.duration,
                        width = info.width,
                        height = info.height,
                        fps = info.fps,
                        "segment analyzed"
                    );
                    analyzed.push(segment.analyzed(&info));
                }
                Err(err) => {
                    tracing::warn!(
                        segment = %segment.title,
                        index = i + 1,
                        error = %err,
                        "dropping segment that failed analysis"
                    );
                }
            }
        }

        if analyzed.is_empty() {
            return Err(AppendError::Analysis(format!(
                "none of the {} segments could be analyzed",
                segments.len()
            )));
        }

        Ok(analyzed)
    }

    /// Step 3: re-encode segments that differ from the target format.
    /// Conforming segments pass through untouched.
    fn normalize(
        &self,
        segments: &[VideoSegment],
        work: &WorkDir,
    ) -> AppendResult<Vec<VideoSegment>> {
        let mut prepared = Vec::with_capacity(segments.len());

        for (i, segment) in segments.iter().enumerate() {
            if segment.matches_target(&self.target) {
                tracing::debug!(segment = %segment.title, "segment already conforms, passing through");
                prepared.push(segment.clone());
                continue;
            }

            let out = work.file(&format!("normalized_{:02}.mp4", i + 1));
            let spec = normalize_command(&segment.path, &out, &self.target);

            self.transcoder
                .run_expecting_success(&spec, self.transcode_timeout)
                .map_err(|source| AppendError::Normalize {
                    index: i + 1,
                    title: segment.title.clone(),
                    source,
                })?;

            prepared.push(segment.normalized(&out, &self.target));
        }

        Ok(prepared)
    }

    /// Step 4a: lossless concat of uniform segments via a manifest file.
    fn concat_stream_copy(
        &self,
        segments: &[VideoSegment],
        work: &WorkDir,
        output_path: &Path,
    ) -> AppendResult<()> {
        let list_path = work.file("concat.txt");
        let manifest: String = segments.iter().map(|s| concat_list_entry(&s.path)).collect();
        fs::write(&list_path, manifest)
            .map_err(|e| AppendError::io("writing concat manifest", e))?;

        let spec = concat_copy_command(&list_path, output_path);
        self.transcoder
            .run_expecting_success(&spec, self.transcode_timeout)?;
        Ok(())
    }

    /// Step 4b: one filter-graph encode with blend transitions.
    fn concat_with_transitions(
        &self,
        segments: &[VideoSegment],
        transitions: &TransitionSettings,
        output_path: &Path,
    ) -> AppendResult<()> {
        let graph = TransitionGraphBuilder::new(segments, &self.target, transitions).build();
        let inputs: Vec<PathBuf> = segments.iter().map(|s| s.path.clone()).collect();
        let spec = filter_graph_command(
            &inputs,
            &graph,
            VIDEO_OUT,
            AUDIO_OUT,
            output_path,
            &self.target,
        );

        self.transcoder
            .run_expecting_success(&spec, self.transcode_timeout)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{CommandSpec, MediaError, MediaInfo, ProcessOutput};
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Probe returning canned infos keyed by file name.
    struct MockProbe {
        infos: HashMap<String, MediaInfo>,
        failing: Vec<String>,
        calls: Mutex<Vec<PathBuf>>,
    }

    impl MockProbe {
        fn new() -> Self {
            Self {
                infos: HashMap::new(),
                failing: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_info(mut self, name: &str, width: u32, height: u32, fps: f64, duration: f64) -> Self {
            self.infos.insert(
                name.to_string(),
                MediaInfo {
                    duration,
                    width,
                    height,
                    fps,
                    video_codec: "h264".to_string(),
                    audio_codec: Some("aac".to_string()),
                },
            );
            self
        }

        fn with_failure(mut self, name: &str) -> Self {
            self.failing.push(name.to_string());
            self
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    impl MediaProbe for MockProbe {
        fn inspect(&self, path: &Path, _timeout: Duration) -> Result<MediaInfo, MediaError> {
            self.calls.lock().push(path.to_path_buf());
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if self.failing.contains(&name) {
                return Err(MediaError::process_failed("ffprobe", 1, "corrupt header"));
            }
            self.infos
                .get(&name)
                .cloned()
                .ok_or_else(|| MediaError::process_failed("ffprobe", 1, "unknown file"))
        }
    }

    /// Transcoder that records commands and touches output files.
    struct MockTranscoder {
        calls: Mutex<Vec<CommandSpec>>,
        fail_normalize: bool,
        timeout_all: bool,
    }

    impl MockTranscoder {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_normalize: false,
                timeout_all: false,
            }
        }

        fn failing_normalize() -> Self {
            Self {
                fail_normalize: true,
                ..Self::new()
            }
        }

        fn timing_out() -> Self {
            Self {
                timeout_all: true,
                ..Self::new()
            }
        }

        fn commands(&self) -> Vec<CommandSpec> {
            self.calls.lock().clone()
        }

        fn normalize_calls(&self) -> usize {
            self.commands()
                .iter()
                .filter(|c| c.args.iter().any(|a| a == "-vf"))
                .count()
        }

        fn concat_calls(&self) -> usize {
            self.commands()
                .iter()
                .filter(|c| c.args.iter().any(|a| a == "concat"))
                .count()
        }
    }

    impl MediaTranscoder for MockTranscoder {
        fn run(&self, spec: &CommandSpec, _timeout: Duration) -> Result<ProcessOutput, MediaError> {
            self.calls.lock().push(spec.clone());

            if self.timeout_all {
                return Err(MediaError::timeout("ffmpeg", 600));
            }

            let is_normalize = spec.args.iter().any(|a| a == "-vf");
            if self.fail_normalize && is_normalize {
                return Ok(ProcessOutput {
                    exit_code: 1,
                    stdout: String::new(),
                    stderr: "encoder crashed".to_string(),
                });
            }

            // ffmpeg writes its output file as the last argument.
            if let Some(out) = spec.args.last() {
                std::fs::write(out, b"video").unwrap();
            }
            Ok(ProcessOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn generate(&self) -> String {
            "test-id".to_string()
        }
    }

    struct Fixture {
        _root: tempfile::TempDir,
        dir: PathBuf,
        out: PathBuf,
        probe: Arc<MockProbe>,
        transcoder: Arc<MockTranscoder>,
        engine: VideoAppendingEngine,
    }

    fn fixture(probe: MockProbe, transcoder: MockTranscoder) -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().to_path_buf();
        let mut settings = Settings::default();
        settings.paths.temp_root = dir.join("tmp").to_string_lossy().to_string();

        let probe = Arc::new(probe);
        let transcoder = Arc::new(transcoder);
        let engine = VideoAppendingEngine::new(&settings, probe.clone(), transcoder.clone())
            .with_id_generator(Arc::new(FixedIds));

        Fixture {
            out: dir.join("out").join("final.mp4"),
            dir,
            _root: root,
            probe,
            transcoder,
            engine,
        }
    }

    fn touch(fix: &Fixture, name: &str) -> VideoSegment {
        let path = fix.dir.join(name);
        std::fs::write(&path, b"clip").unwrap();
        VideoSegment::new(path, name)
    }

    #[test]
    fn empty_segment_list_is_rejected_before_any_process() {
        let fix = fixture(MockProbe::new(), MockTranscoder::new());
        let result = fix.engine.append(&[], &fix.out, None, false);

        assert!(!result.success);
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .contains("No video segments provided for appending"));
        assert_eq!(fix.probe.call_count(), 0);
        assert!(fix.transcoder.commands().is_empty());
    }

    #[test]
    fn missing_segment_reports_one_based_index_and_path() {
        let fix = fixture(MockProbe::new(), MockTranscoder::new());
        let a = touch(&fix, "a.mp4");
        let b = VideoSegment::new(fix.dir.join("missing.mp4"), "B");

        let result = fix.engine.append(&[a, b], &fix.out, None, false);

        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("Segment 2 not found"));
        assert!(error.contains("missing.mp4"));
        // No process was invoked for either segment.
        assert_eq!(fix.probe.call_count(), 0);
        assert!(fix.transcoder.commands().is_empty());
    }

    #[test]
    fn total_duration_is_sum_of_analyzed_durations() {
        let probe = MockProbe::new()
            .with_info("a.mp4", 1280, 720, 30.0, 5.0)
            .with_info("b.mp4", 1280, 720, 30.0, 7.5);
        let fix = fixture(probe, MockTranscoder::new());
        let segments = [touch(&fix, "a.mp4"), touch(&fix, "b.mp4")];

        let result = fix.engine.append(&segments, &fix.out, None, false);

        assert!(result.success, "{:?}", result.error);
        assert_eq!(fix.engine.target_format().width, 1280);
        assert_eq!(result.total_duration, 12.5);
        assert_eq!(result.segments_count, 2);
        assert!(fix.out.exists());
        // Stream-copy path: exactly one concat call, no re-encode.
        assert_eq!(fix.transcoder.concat_calls(), 1);
        assert_eq!(fix.transcoder.normalize_calls(), 0);
    }

    #[test]
    fn conforming_segment_passes_through_normalization() {
        let probe = MockProbe::new()
            .with_info("good.mp4", 1280, 720, 30.0, 5.0)
            .with_info("small.mp4", 640, 480, 24.0, 5.0);
        let fix = fixture(probe, MockTranscoder::new());
        let segments = [touch(&fix, "good.mp4"), touch(&fix, "small.mp4")];

        let result = fix.engine.append(&segments, &fix.out, None, true);

        assert!(result.success, "{:?}", result.error);
        // Only the 640x480 segment was transcoded.
        assert_eq!(fix.transcoder.normalize_calls(), 1);
        let commands = fix.transcoder.commands();
        let normalize = commands
            .iter()
            .find(|c| c.args.iter().any(|a| a == "-vf"))
            .unwrap();
        assert!(normalize.args.iter().any(|a| a.contains("small.mp4")));
        assert!(normalize
            .args
            .last()
            .unwrap()
            .contains("normalized_02.mp4"));
    }

    #[test]
    fn failed_analysis_drops_segment_but_continues() {
        let probe = MockProbe::new()
            .with_info("a.mp4", 1280, 720, 30.0, 5.0)
            .with_failure("b.mp4");
        let fix = fixture(probe, MockTranscoder::new());
        let segments = [touch(&fix, "a.mp4"), touch(&fix, "b.mp4")];

        let result = fix.engine.append(&segments, &fix.out, None, false);

        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.segments_count, 1);
        assert_eq!(result.total_duration, 5.0);
    }

    #[test]
    fn all_segments_failing_analysis_aborts() {
        let probe = MockProbe::new().with_failure("a.mp4").with_failure("b.mp4");
        let fix = fixture(probe, MockTranscoder::new());
        let segments = [touch(&fix, "a.mp4"), touch(&fix, "b.mp4")];

        let result = fix.engine.append(&segments, &fix.out, None, false);

        assert!(!result.success);
        assert!(result
            .error
            .unwrap()
            .contains("none of the 2 segments could be analyzed"));
        assert!(fix.transcoder.commands().is_empty());
    }

    #[test]
    fn normalization_failure_aborts_whole_call() {
        let probe = MockProbe::new()
            .with_info("a.mp4", 640, 480, 24.0, 5.0)
            .with_info("b.mp4", 1280, 720, 30.0, 5.0);
        let fix = fixture(probe, MockTranscoder::failing_normalize());
        let segments = [touch(&fix, "a.mp4"), touch(&fix, "b.mp4")];

        let result = fix.engine.append(&segments, &fix.out, None, true);

        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("Normalization failed for segment 1"));
        assert!(error.contains("a.mp4"));
        // No concatenation was attempted after the failure.
        assert_eq!(fix.transcoder.concat_calls(), 0);
        assert!(!fix.out.exists());
    }

    #[test]
    fn transitions_use_filter_graph_but_duration_stays_nominal() {
        let probe = MockProbe::new()
            .with_info("a.mp4", 1280, 720, 30.0, 5.0)
            .with_info("b.mp4", 1280, 720, 30.0, 5.0);
        let fix = fixture(probe, MockTranscoder::new());
        let segments = [touch(&fix, "a.mp4"), touch(&fix, "b.mp4")];
        let transitions = TransitionSettings::default(); // 1s fade

        let result = fix
            .engine
            .append(&segments, &fix.out, Some(&transitions), true);

        assert!(result.success, "{:?}", result.error);
        // Regression contract: the nominal sum, not the post-blend 9.0.
        assert_eq!(result.total_duration, 10.0);

        let commands = fix.transcoder.commands();
        let encode = commands
            .iter()
            .find(|c| c.args.iter().any(|a| a == "-filter_complex"))
            .expect("transition append must go through a filter graph");
        let graph = &encode.args[encode.args.iter().position(|a| a == "-filter_complex").unwrap() + 1];
        assert!(graph.contains("xfade=transition=fade:duration=1.000:offset=4.000"));
        assert!(graph.contains("concat=n=2:v=0:a=1"));
    }

    #[test]
    fn cut_transitions_take_the_stream_copy_path() {
        let probe = MockProbe::new()
            .with_info("a.mp4", 1280, 720, 30.0, 5.0)
            .with_info("b.mp4", 1280, 720, 30.0, 5.0);
        let fix = fixture(probe, MockTranscoder::new());
        let segments = [touch(&fix, "a.mp4"), touch(&fix, "b.mp4")];
        let cut = TransitionSettings {
            transition_type: crate::models::TransitionType::Cut,
            ..Default::default()
        };

        let result = fix.engine.append(&segments, &fix.out, Some(&cut), true);

        assert!(result.success, "{:?}", result.error);
        assert_eq!(fix.transcoder.concat_calls(), 1);
        assert!(!fix
            .transcoder
            .commands()
            .iter()
            .any(|c| c.args.iter().any(|a| a == "-filter_complex")));
    }

    #[test]
    fn timeout_failure_is_reported_distinctly() {
        let probe = MockProbe::new().with_info("a.mp4", 1280, 720, 30.0, 5.0);
        let fix = fixture(probe, MockTranscoder::timing_out());
        let segments = [touch(&fix, "a.mp4")];

        let result = fix.engine.append(&segments, &fix.out, None, false);

        assert!(!result.success);
        assert!(result.error.unwrap().contains("timed out after 600s"));
    }

    #[test]
    fn work_directory_is_removed_on_success_and_failure() {
        let probe = MockProbe::new()
            .with_info("a.mp4", 1280, 720, 30.0, 5.0)
            .with_info("b.mp4", 640, 480, 24.0, 5.0);
        let fix = fixture(probe, MockTranscoder::new());
        let segments = [touch(&fix, "a.mp4"), touch(&fix, "b.mp4")];

        let result = fix.engine.append(&segments, &fix.out, None, true);
        assert!(result.success, "{:?}", result.error);

        let work_path = fix.dir.join("tmp").join("append_test-id");
        assert!(!work_path.exists());

        // Failure path: missing input aborts after validation would pass...
        let failing = fixture(
            MockProbe::new().with_failure("a.mp4"),
            MockTranscoder::new(),
        );
        let seg = touch(&failing, "a.mp4");
        let result = failing.engine.append(&[seg], &failing.out, None, false);
        assert!(!result.success);
        assert!(!failing.dir.join("tmp").join("append_test-id").exists());
    }

    #[test]
    fn input_segments_are_never_deleted() {
        let probe = MockProbe::new().with_info("a.mp4", 640, 480, 24.0, 3.0);
        let fix = fixture(probe, MockTranscoder::new());
        let segment = touch(&fix, "a.mp4");

        let result = fix.engine.append(&[segment.clone()], &fix.out, None, true);

        assert!(result.success, "{:?}", result.error);
        assert!(segment.path.exists());
    }

    #[test]
    fn append_is_idempotent_for_identical_inputs() {
        let probe = MockProbe::new()
            .with_info("a.mp4", 1280, 720, 30.0, 4.0)
            .with_info("b.mp4", 1280, 720, 30.0, 6.0);
        let fix = fixture(probe, MockTranscoder::new());
        let segments = [touch(&fix, "a.mp4"), touch(&fix, "b.mp4")];

        let first = fix.engine.append(&segments, &fix.out, None, false);
        let second = fix.engine.append(&segments, &fix.out, None, false);

        assert!(first.success && second.success);
        assert_eq!(first.total_duration, second.total_duration);
        assert_eq!(first.segments_count, second.segments_count);
    }

    #[test]
    fn single_segment_with_transitions_falls_back_to_stream_copy() {
        let probe = MockProbe::new().with_info("a.mp4", 1280, 720, 30.0, 5.0);
        let fix = fixture(probe, MockTranscoder::new());
        let segments = [touch(&fix, "a.mp4")];

        let result =
            fix.engine
                .append(&segments, &fix.out, Some(&TransitionSettings::default()), true);

        assert!(result.success, "{:?}", result.error);
        assert_eq!(fix.transcoder.concat_calls(), 1);
    }
}
