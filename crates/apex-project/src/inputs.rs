//! Merge input and output resolution.

use std::path::{Path, PathBuf};

use crate::error::ValidationError;

/// A merge needs at least this many manifests.
pub const MIN_MERGE_INPUTS: usize = 2;

/// Output file name used when none is given.
pub const DEFAULT_OUTPUT_NAME: &str = "mergedPackage";

const MANIFEST_SUFFIX: &str = ".xml";

/// Turn `--files` arguments into a sorted, de-duplicated list of paths.
///
/// Each argument may hold a comma-separated list. Relative paths are joined
/// onto `cwd`. Fails if fewer than [`MIN_MERGE_INPUTS`] distinct paths remain.
pub fn resolve_inputs<S: AsRef<str>>(
    raw: &[S],
    cwd: &Path,
) -> Result<Vec<PathBuf>, ValidationError> {
    let mut paths: Vec<PathBuf> = raw
        .iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(|arg| cwd.join(arg))
        .collect();
    paths.sort();
    paths.dedup();

    if paths.len() < MIN_MERGE_INPUTS {
        return Err(ValidationError::TooFewInputs {
            min: MIN_MERGE_INPUTS,
            actual: paths.len(),
        });
    }
    Ok(paths)
}

/// Fail on the first path that is not an existing file.
pub fn check_inputs_exist(paths: &[PathBuf]) -> Result<(), ValidationError> {
    match paths.iter().find(|path| !path.is_file()) {
        Some(missing) => Err(ValidationError::InputNotFound {
            path: missing.clone(),
        }),
        None => Ok(()),
    }
}

/// Where the merged manifest goes.
///
/// A blank name falls back to [`DEFAULT_OUTPUT_NAME`]; `.xml` is appended
/// when missing; a bare file name lands in `merged_dir`, anything with a
/// directory component is used as given.
pub fn resolve_output(raw: Option<&str>, merged_dir: &Path) -> PathBuf {
    let name = raw
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_OUTPUT_NAME);

    let mut file = name.to_string();
    if !file.ends_with(MANIFEST_SUFFIX) {
        file.push_str(MANIFEST_SUFFIX);
    }

    let path = PathBuf::from(file);
    if path.components().count() == 1 {
        merged_dir.join(path)
    } else {
        path
    }
}

/// Refuse to replace an existing output unless `force` is set.
pub fn check_output_writable(path: &Path, force: bool) -> Result<(), ValidationError> {
    if path.exists() && !force {
        return Err(ValidationError::OutputExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
