//! Generation-mode orchestration.
//!
//! The [`ModeOrchestrator`] accepts a [`GenerationRequest`], dispatches to
//! one of three mode handlers, drives each handler's phase sequence, and
//! returns a [`GenerationResult`]. All failure comes back inside the
//! result; nothing panics or propagates an error across the boundary.
//!
//! # Architecture
//!
//! ```text
//! ModeOrchestrator::generate
//!     ├── VideoOnly:         ScriptPrep -> Speech -> ReferenceFrame -> Avatar -> Finalize
//!     ├── PresentationOnly:  SlidesAcquire -> SlideSpeech -> SlideRender -> Finalize
//!     └── VideoPresentation: VideoOnly (sandbox A) -> PresentationOnly (sandbox B) -> Append
//! ```

mod context;
mod errors;
mod modes;
mod phase;
mod types;

pub use errors::GenerationError;
pub use phase::Phase;
pub use types::{Collaborators, ProgressCallback};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use context::GenerationContext;
use types::ModeOutcome;

use crate::appending::VideoAppendingEngine;
use crate::config::Settings;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::integrations::{
    AvatarEngine, ContentProcessor, SlidesProcessor, SlidesToVideoRenderer, VoiceProfileManager,
};
use crate::media::MediaProbe;
use crate::models::{GenerationMode, GenerationRequest, GenerationResult};

/// Drives a full generation request through its phase sequence.
///
/// Holds only immutable configuration and shared collaborators, so
/// independent `generate` calls may run concurrently; isolation comes from
/// per-call uuid-scoped working directories.
pub struct ModeOrchestrator {
    settings: Settings,
    voice: Arc<dyn VoiceProfileManager>,
    content: Arc<dyn ContentProcessor>,
    avatar: Arc<dyn AvatarEngine>,
    slides: Arc<dyn SlidesProcessor>,
    renderer: Arc<dyn SlidesToVideoRenderer>,
    probe: Arc<dyn MediaProbe>,
    engine: VideoAppendingEngine,
    ids: Arc<dyn IdGenerator>,
    progress: Option<ProgressCallback>,
}

impl ModeOrchestrator {
    /// Create an orchestrator from settings and collaborators.
    pub fn new(settings: Settings, collaborators: Collaborators) -> Self {
        let engine = VideoAppendingEngine::new(
            &settings,
            Arc::clone(&collaborators.probe),
            Arc::clone(&collaborators.transcoder),
        );

        Self {
            settings,
            voice: collaborators.voice,
            content: collaborators.content,
            avatar: collaborators.avatar,
            slides: collaborators.slides,
            renderer: collaborators.renderer,
            probe: collaborators.probe,
            engine,
            ids: Arc::new(UuidGenerator),
            progress: None,
        }
    }

    /// Replace the ID generator (deterministic IDs for tests).
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.engine = self.engine.with_id_generator(Arc::clone(&ids));
        self.ids = ids;
        self
    }

    /// Set a progress callback invoked at phase boundaries.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Generate a narrated video.
    ///
    /// Never panics or returns an error across this boundary - all failure
    /// comes back as `GenerationResult { success: false, .. }` with the
    /// elapsed processing time up to the failure point and an error string
    /// prefixed by the failing phase.
    pub fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let started = Instant::now();

        match self.run(request) {
            Ok(outcome) => {
                tracing::info!(
                    mode = %request.mode,
                    output = %outcome.output_path.display(),
                    duration = outcome.total_duration,
                    "generation completed"
                );
                GenerationResult::success(
                    request.mode,
                    outcome.output_path,
                    outcome.total_duration,
                    outcome.avatar_duration,
                    outcome.presentation_duration,
                    started.elapsed(),
                )
            }
            Err(err) => {
                tracing::error!(mode = %request.mode, error = %err, "generation failed");
                GenerationResult::failure(request.mode, err.to_string(), started.elapsed())
            }
        }
    }

    fn run(&self, request: &GenerationRequest) -> Result<ModeOutcome, GenerationError> {
        // Preconditions run before any temp directory or output path is
        // materialized.
        self.check_preconditions(request)?;

        let run_id = self.ids.generate();
        let ctx = GenerationContext::create(request, &self.settings, run_id)?;
        ctx.logger
            .info(&format!("mode: {} ({})", request.mode, ctx.run_id));

        let outcome = match request.mode {
            GenerationMode::VideoOnly => self.run_video_only(&ctx),
            GenerationMode::PresentationOnly => self.run_presentation_only(&ctx),
            GenerationMode::VideoPresentation => self.run_video_presentation(&ctx),
        };

        match &outcome {
            Ok(o) => {
                self.report_progress(Phase::Finalize, 100, "generation finished");
                ctx.logger
                    .success(&format!("output ready: {}", o.output_path.display()));
            }
            Err(e) => ctx.logger.error(&e.to_string()),
        }

        outcome
    }

    /// Cheap request validation, before any expensive work starts.
    fn check_preconditions(&self, request: &GenerationRequest) -> Result<(), GenerationError> {
        if request.voice_profile.trim().is_empty() {
            return Err(GenerationError::validation(
                Phase::Init,
                "no voice profile specified",
            ));
        }

        if self.voice.get_profile(&request.voice_profile).is_none() {
            return Err(GenerationError::validation(
                Phase::Init,
                format!("voice profile '{}' not found", request.voice_profile),
            ));
        }

        if request.needs_presentation() && !request.has_single_presentation_source() {
            return Err(GenerationError::validation(
                Phase::Init,
                "exactly one presentation source must be set (slides URL or new-slide generation)",
            ));
        }

        Ok(())
    }

    /// Log a phase marker and report progress.
    pub(crate) fn enter_phase(&self, ctx: &GenerationContext<'_>, phase: Phase, percent: u32) {
        ctx.logger.phase(phase.name());
        ctx.logger.progress(percent);
        self.report_progress(phase, percent, &format!("starting {}", phase.name()));
    }

    fn report_progress(&self, phase: Phase, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress {
            callback(phase.name(), percent, message);
        }
    }

    /// Move the produced file into place, probe it, and enforce the
    /// success invariant (file exists, duration positive).
    pub(crate) fn finalize_output(
        &self,
        ctx: &GenerationContext<'_>,
        produced: PathBuf,
    ) -> Result<(PathBuf, f64), GenerationError> {
        self.enter_phase(ctx, Phase::Finalize, 95);

        if produced != ctx.output_path {
            move_file(&produced, &ctx.output_path)
                .map_err(|e| GenerationError::io(Phase::Finalize, "moving output into place", e))?;
        }

        if !ctx.output_path.exists() {
            return Err(GenerationError::validation(
                Phase::Finalize,
                format!("output file was not created: {}", ctx.output_path.display()),
            ));
        }

        let info = self
            .probe
            .inspect(&ctx.output_path, self.settings.media.probe_timeout())
            .map_err(|e| GenerationError::media(Phase::Finalize, e))?;

        if info.duration <= 0.0 {
            return Err(GenerationError::validation(
                Phase::Finalize,
                format!("output has zero duration: {}", ctx.output_path.display()),
            ));
        }

        Ok((ctx.output_path.clone(), info.duration))
    }
}

/// Rename with a copy+delete fallback for cross-device moves.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
