//! Local file existence checks.

use std::path::{Path, PathBuf};

/// Read-only existence check against the uploads root.
pub trait FileProbe: Send + Sync {
    /// Whether a file exists at `path`. Any I/O failure counts as "missing".
    fn exists(&self, path: &Path) -> bool;

    /// Directory that upload URL suffixes are resolved against.
    fn root(&self) -> &Path;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone)]
pub struct LocalFiles {
    root: PathBuf,
}

impl LocalFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileProbe for LocalFiles {
    fn exists(&self, path: &Path) -> bool {
        match path.try_exists() {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "existence check failed, treating as missing");
                false
            }
        }
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
