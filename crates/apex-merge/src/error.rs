//! Error types for the merge engine.

use std::path::{Path, PathBuf};

use apex_codec::CodecError;
use thiserror::Error;

/// Errors raised while merging manifests.
///
/// Both variants name the offending file. Files merged before the failure
/// stay merged.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The manifest could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest could not be decoded.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

impl MergeError {
    /// The file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            MergeError::Read { path, .. } | MergeError::Parse { path, .. } => path,
        }
    }
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
