//! Injectable ID generation for per-call working directories.
//!
//! Production code uses UUID v4; tests inject deterministic generators so
//! temp paths are predictable.

use uuid::Uuid;

/// Capability for generating unique identifiers.
pub trait IdGenerator: Send + Sync {
    /// Generate a new identifier.
    fn generate(&self) -> String;
}

/// UUID v4 backed generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
