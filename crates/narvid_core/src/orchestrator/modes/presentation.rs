//! PresentationOnly: narrated slide deck rendering.
//!
//! Init -> SlidesAcquire -> PerSlideSpeechSynthesis -> SlideRender
//! -> Finalize, failing fast at every arrow.

use std::path::PathBuf;

use crate::integrations::{RenderedPresentation, Slide, SlideDeck};
use crate::orchestrator::context::GenerationContext;
use crate::orchestrator::errors::GenerationError;
use crate::orchestrator::phase::Phase;
use crate::orchestrator::types::ModeOutcome;
use crate::orchestrator::ModeOrchestrator;

impl ModeOrchestrator {
    /// Run the presentation pipeline into the context's output path.
    pub(crate) fn run_presentation_only(
        &self,
        ctx: &GenerationContext<'_>,
    ) -> Result<ModeOutcome, GenerationError> {
        let deck = self.acquire_slides(ctx)?;
        let (slides, audio_files) = self.synthesize_slide_audio(ctx, &deck)?;
        let rendered = self.render_presentation(ctx, &slides, &audio_files)?;

        let (output_path, duration) = self.finalize_output(ctx, rendered.output_path)?;
        Ok(ModeOutcome {
            output_path,
            total_duration: duration,
            avatar_duration: 0.0,
            presentation_duration: duration,
        })
    }

    /// Acquire the deck from the request's single presentation source.
    fn acquire_slides(&self, ctx: &GenerationContext<'_>) -> Result<SlideDeck, GenerationError> {
        self.enter_phase(ctx, Phase::SlidesAcquire, 10);

        let deck = if let Some(url) = &ctx.request.slides_url {
            if !self.slides.validate_access(url) {
                return Err(GenerationError::integration(
                    Phase::SlidesAcquire,
                    format!("slides are not accessible: {url}"),
                ));
            }
            let out_dir = ctx.work.file("slides");
            self.slides
                .process_url(url, &out_dir)
                .map_err(|e| GenerationError::integration(Phase::SlidesAcquire, e))?
        } else {
            // generate_new_slides: author a deck from the narration script.
            let script = self.resolve_script(ctx, Phase::SlidesAcquire)?;
            let out_dir = ctx.work.file("slides");
            self.slides
                .generate_deck(&script, &out_dir)
                .map_err(|e| GenerationError::integration(Phase::SlidesAcquire, e))?
        };

        if deck.slides.is_empty() {
            return Err(GenerationError::integration(
                Phase::SlidesAcquire,
                "presentation contains no slides",
            ));
        }

        ctx.logger
            .info(&format!("acquired {} slides", deck.slides.len()));
        Ok(deck)
    }

    /// Synthesize narration for every slide that has notes.
    ///
    /// Slides without notes are skipped entirely - neither rendered nor
    /// silently rendered blank. Zero narrated slides is a failure, not a
    /// zero-length success.
    fn synthesize_slide_audio(
        &self,
        ctx: &GenerationContext<'_>,
        deck: &SlideDeck,
    ) -> Result<(Vec<Slide>, Vec<PathBuf>), GenerationError> {
        self.enter_phase(ctx, Phase::SlideSpeech, 30);

        let mut slides = Vec::new();
        let mut audio_files = Vec::new();

        for slide in &deck.slides {
            let Some(narration) = slide.narration() else {
                ctx.logger.warn(&format!(
                    "slide {} has no narration notes, skipping",
                    slide.index
                ));
                continue;
            };

            let out = ctx.work.file(&format!("slide_{:02}.wav", slide.index));
            self.voice
                .generate_speech(narration, &ctx.request.voice_profile, &out)
                .map_err(|e| {
                    GenerationError::integration(
                        Phase::SlideSpeech,
                        format!("slide {}: {}", slide.index, e),
                    )
                })?;

            slides.push(slide.clone());
            audio_files.push(out);
        }

        if slides.is_empty() {
            return Err(GenerationError::integration(
                Phase::SlideSpeech,
                "no audio generated for any slide",
            ));
        }

        ctx.logger.info(&format!(
            "narrated {} of {} slides",
            slides.len(),
            deck.slides.len()
        ));
        Ok((slides, audio_files))
    }

    /// Render the narrated slides into a single video.
    fn render_presentation(
        &self,
        ctx: &GenerationContext<'_>,
        slides: &[Slide],
        audio_files: &[PathBuf],
    ) -> Result<RenderedPresentation, GenerationError> {
        self.enter_phase(ctx, Phase::SlideRender, 60);

        let out = ctx.work.file("presentation_render.mp4");
        let rendered = self
            .renderer
            .render(slides, audio_files, &out)
            .map_err(|e| GenerationError::integration(Phase::SlideRender, e))?;

        if !rendered.output_path.exists() {
            return Err(GenerationError::validation(
                Phase::SlideRender,
                "slide renderer reported success but produced no video",
            ));
        }

        Ok(rendered)
    }
}
