//! VideoOnly: talking-head generation.
//!
//! Init -> ScriptPrep -> SpeechSynthesis -> ReferenceFrame (if needed)
//! -> AvatarGeneration -> Finalize, failing fast at every arrow.

use std::path::PathBuf;

use crate::integrations::AvatarVideo;
use crate::orchestrator::context::GenerationContext;
use crate::orchestrator::errors::GenerationError;
use crate::orchestrator::phase::Phase;
use crate::orchestrator::types::ModeOutcome;
use crate::orchestrator::ModeOrchestrator;

/// Guidance handed to the content processor when deriving a script.
const SCRIPT_INSTRUCTIONS: &str =
    "Turn the document into a spoken narration script suitable for a presenter.";

impl ModeOrchestrator {
    /// Run the avatar-only pipeline into the context's output path.
    pub(crate) fn run_video_only(
        &self,
        ctx: &GenerationContext<'_>,
    ) -> Result<ModeOutcome, GenerationError> {
        self.enter_phase(ctx, Phase::ScriptPrep, 10);
        let script = self.resolve_script(ctx, Phase::ScriptPrep)?;

        let audio = self.synthesize_narration(ctx, &script)?;
        let reference = self.resolve_reference_image(ctx)?;
        let avatar = self.generate_avatar(ctx, &audio, &reference)?;

        let (output_path, duration) = self.finalize_output(ctx, avatar.output_path)?;
        Ok(ModeOutcome {
            output_path,
            total_duration: duration,
            avatar_duration: duration,
            presentation_duration: 0.0,
        })
    }

    /// Resolve the narration script from the request.
    ///
    /// Inline text wins over the content file; having neither is a
    /// distinct failure from the processor failing on the file.
    pub(crate) fn resolve_script(
        &self,
        ctx: &GenerationContext<'_>,
        phase: Phase,
    ) -> Result<String, GenerationError> {
        if let Some(text) = &ctx.request.content_text {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                ctx.logger.info("using inline narration text");
                return Ok(trimmed.to_string());
            }
        }

        if let Some(file) = &ctx.request.content_file {
            ctx.logger
                .info(&format!("deriving narration from {}", file.display()));
            return self
                .content
                .process_content_file(file, SCRIPT_INSTRUCTIONS)
                .map_err(|e| GenerationError::integration(phase, e));
        }

        Err(GenerationError::validation(
            phase,
            "no narration source provided (set content text or a content file)",
        ))
    }

    /// Synthesize the full narration into the working directory.
    fn synthesize_narration(
        &self,
        ctx: &GenerationContext<'_>,
        script: &str,
    ) -> Result<PathBuf, GenerationError> {
        self.enter_phase(ctx, Phase::SpeechSynthesis, 30);

        let out = ctx.work.file("narration.wav");
        self.voice
            .generate_speech(script, &ctx.request.voice_profile, &out)
            .map_err(|e| GenerationError::integration(Phase::SpeechSynthesis, e))?;

        if !out.exists() {
            return Err(GenerationError::validation(
                Phase::SpeechSynthesis,
                "speech synthesis reported success but produced no audio file",
            ));
        }

        Ok(out)
    }

    /// Pick the avatar likeness: extracted from the reference video when
    /// one was supplied, else the configured default image. A missing
    /// default is a failure; there is no silent fallback.
    fn resolve_reference_image(
        &self,
        ctx: &GenerationContext<'_>,
    ) -> Result<PathBuf, GenerationError> {
        self.enter_phase(ctx, Phase::ReferenceFrame, 50);

        if let Some(video) = &ctx.request.reference_video {
            if !video.exists() {
                return Err(GenerationError::validation(
                    Phase::ReferenceFrame,
                    format!("reference video not found: {}", video.display()),
                ));
            }

            let out = ctx.work.file("reference.png");
            self.avatar
                .extract_reference_frame(video, &out)
                .map_err(|e| GenerationError::integration(Phase::ReferenceFrame, e))?;

            if !out.exists() {
                return Err(GenerationError::validation(
                    Phase::ReferenceFrame,
                    "frame extraction reported success but produced no image",
                ));
            }
            return Ok(out);
        }

        let default = PathBuf::from(&self.settings.avatar.default_reference_image);
        if !default.exists() {
            return Err(GenerationError::validation(
                Phase::ReferenceFrame,
                format!(
                    "default avatar image not found: {} (no fallback available)",
                    default.display()
                ),
            ));
        }
        ctx.logger
            .info(&format!("using default avatar image {}", default.display()));
        Ok(default)
    }

    /// Drive the avatar engine.
    fn generate_avatar(
        &self,
        ctx: &GenerationContext<'_>,
        audio: &PathBuf,
        reference: &PathBuf,
    ) -> Result<AvatarVideo, GenerationError> {
        self.enter_phase(ctx, Phase::AvatarGeneration, 60);

        let result = self
            .avatar
            .generate_avatar_video(audio, reference, ctx.work.path(), ctx.request.quality)
            .map_err(|e| GenerationError::integration(Phase::AvatarGeneration, e))?;

        if !result.output_path.exists() {
            return Err(GenerationError::validation(
                Phase::AvatarGeneration,
                "avatar engine reported success but produced no video",
            ));
        }

        ctx.logger.info(&format!(
            "avatar synthesized in {:.1}s",
            result.processing_time
        ));
        Ok(result)
    }
}
