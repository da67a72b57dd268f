//! Scoped working directories.
//!
//! A [`WorkDir`] is created per call and removed when dropped, so every
//! exit path - success, failure, or panic unwind - cleans up the temp
//! artifacts it owns.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A working directory removed on drop.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// Create `<root>/<name>`, including missing parents.
    pub fn create(root: &Path, name: &str) -> io::Result<Self> {
        let path = root.join(name);
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    /// The directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A file path inside the directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// A nested subdirectory inside this one, also removed when its guard
    /// drops.
    pub fn subdir(&self, name: &str) -> io::Result<WorkDir> {
        WorkDir::create(&self.path, name)
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove working directory"
                );
            }
        }
    }
}
