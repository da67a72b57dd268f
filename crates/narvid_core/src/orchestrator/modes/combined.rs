//! VideoPresentation: avatar introduction followed by the narrated
//! presentation.
//!
//! Composes the two other handlers with isolated sub-contexts, then
//! appends their outputs with format normalization.

use crate::models::VideoSegment;
use crate::orchestrator::context::GenerationContext;
use crate::orchestrator::errors::GenerationError;
use crate::orchestrator::phase::Phase;
use crate::orchestrator::types::ModeOutcome;
use crate::orchestrator::ModeOrchestrator;

impl ModeOrchestrator {
    /// Run the combined pipeline into the context's output path.
    pub(crate) fn run_video_presentation(
        &self,
        ctx: &GenerationContext<'_>,
    ) -> Result<ModeOutcome, GenerationError> {
        // Part A: avatar introduction in its own sandbox. A failure here
        // means the presentation part never runs.
        let avatar_ctx = ctx.sub("avatar", "avatar_intro.mp4")?;
        let avatar = self.run_video_only(&avatar_ctx)?;

        // Part B: narrated presentation, likewise isolated.
        let pres_ctx = ctx.sub("presentation", "presentation.mp4")?;
        let presentation = self.run_presentation_only(&pres_ctx)?;

        self.enter_phase(ctx, Phase::Append, 90);
        let segments = [
            VideoSegment::new(&avatar.output_path, "Avatar Introduction"),
            VideoSegment::new(&presentation.output_path, "Presentation"),
        ];
        let transitions = ctx
            .request
            .transitions
            .clone()
            .unwrap_or_else(|| self.settings.transitions.clone());

        let appended = self
            .engine
            .append(&segments, &ctx.output_path, Some(&transitions), true);

        if !appended.success {
            return Err(GenerationError::integration(
                Phase::Append,
                appended
                    .error
                    .unwrap_or_else(|| "appending failed without detail".to_string()),
            ));
        }

        ctx.logger.success(&format!(
            "appended {} segments into {}",
            appended.segments_count,
            ctx.output_path.display()
        ));

        Ok(ModeOutcome {
            output_path: ctx.output_path.clone(),
            total_duration: appended.total_duration,
            avatar_duration: avatar.total_duration,
            presentation_duration: presentation.total_duration,
        })
    }
}
