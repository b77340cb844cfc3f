//! Where manifest text comes from.
//!
//! The engine never touches the filesystem directly. It reads through a
//! [`DescriptorSource`], so hosts can serve manifests from disk, memory, or
//! anything else that yields text for a path.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Reads the raw text of a manifest.
pub trait DescriptorSource {
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads manifests from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSource;

impl DescriptorSource for FsSource {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Serves manifests from memory, keyed by path.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    files: HashMap<PathBuf, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style.
    pub fn with(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl DescriptorSource for InMemorySource {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no manifest registered at {}", path.display()),
            )
        })
    }
}
