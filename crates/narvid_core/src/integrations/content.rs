//! Narration script extraction from content files.

use std::path::Path;

use super::IntegrationError;

/// Turns a source document into a spoken narration script.
pub trait ContentProcessor: Send + Sync {
    /// Process `path` into script text, guided by `instructions`.
    fn process_content_file(
        &self,
        path: &Path,
        instructions: &str,
    ) -> Result<String, IntegrationError>;
}
