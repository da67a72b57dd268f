//! Per-generation context: workspace, output target, and logger.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use super::errors::GenerationError;
use super::phase::Phase;
use crate::config::Settings;
use crate::logging::JobLogger;
use crate::media::WorkDir;
use crate::models::GenerationRequest;

/// Read-only context threaded through one generation run.
///
/// Owns the run's working directory; the drop guard removes it on every
/// exit path. The final output lives outside the working directory.
pub(crate) struct GenerationContext<'a> {
    /// The request being processed.
    pub request: &'a GenerationRequest,
    /// Unique run identifier.
    pub run_id: String,
    /// Scoped working directory for intermediate artifacts.
    pub work: WorkDir,
    /// Where the finished video goes.
    pub output_path: PathBuf,
    /// Per-generation logger.
    pub logger: Arc<JobLogger>,
}

impl<'a> GenerationContext<'a> {
    /// Create the top-level context for a run.
    ///
    /// The temp root comes from the request when set, else from settings;
    /// the output path is generated under the configured output folder
    /// when the request leaves it unset.
    pub fn create(
        request: &'a GenerationRequest,
        settings: &Settings,
        run_id: String,
    ) -> Result<Self, GenerationError> {
        let temp_root = request
            .temp_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&settings.paths.temp_root));

        let work = WorkDir::create(&temp_root, &format!("gen_{run_id}"))
            .map_err(|e| GenerationError::io(Phase::Init, "creating working directory", e))?;

        let output_path = request.output_path.clone().unwrap_or_else(|| {
            PathBuf::from(&settings.paths.output_folder)
                .join(format!("{}_{}.mp4", request.mode.slug(), run_id))
        });

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| GenerationError::io(Phase::Init, "creating output directory", e))?;
        }

        let logger = JobLogger::new(
            format!("gen_{run_id}"),
            &settings.paths.logs_folder,
            settings.logging.log_config(),
            None,
        )
        .map(Arc::new)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not create job log file, continuing without");
            Arc::new(JobLogger::disabled(format!("gen_{run_id}")))
        });

        Ok(Self {
            request,
            run_id,
            work,
            output_path,
            logger,
        })
    }

    /// An isolated sub-context for a composed mode handler.
    ///
    /// The sub-run works in `<work>/<name>_work` and writes its output to
    /// `<work>/<output_name>`, outside the sub-workspace so it survives
    /// until the parent finishes.
    pub fn sub(
        &self,
        name: &str,
        output_name: &str,
    ) -> Result<GenerationContext<'a>, GenerationError> {
        let work = self
            .work
            .subdir(&format!("{name}_work"))
            .map_err(|e| GenerationError::io(Phase::Init, "creating sub working directory", e))?;

        Ok(GenerationContext {
            request: self.request,
            run_id: self.run_id.clone(),
            output_path: self.work.file(output_name),
            work,
            logger: Arc::clone(&self.logger),
        })
    }
}
