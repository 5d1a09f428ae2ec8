//! Content providers
//!
//! Turn a resolved content-key into the text that is served. A provider
//! answers `None` for anything it cannot produce, and the request becomes a
//! 404.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub trait ContentProvider: Send {
    fn fetch(&self, key: &str) -> Option<String>;
}

/// Reads content-keys as file paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsContent {
    root: PathBuf,
}

impl FsContent {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentProvider for FsContent {
    fn fetch(&self, key: &str) -> Option<String> {
        let path = self.root.join(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Content unavailable");
                None
            }
        }
    }
}

impl ContentProvider for HashMap<String, String> {
    fn fetch(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
