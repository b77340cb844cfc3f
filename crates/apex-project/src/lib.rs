//! Project-level collaborators of the merge engine.
//!
//! The engine itself accepts any list of paths and any output target. The
//! policy around it lives here: where the project configuration is read
//! from, how command-line file arguments become paths, the minimum number of
//! manifests a merge needs, and where the merged manifest is written.
//!
//! # Modules
//!
//! - [`config`] -- [`ProjectConfig`], read from `.apex-copilot.json`
//! - [`inputs`] -- Input list and output path resolution
//! - [`error`] -- [`ConfigError`] and [`ValidationError`]

pub mod config;
pub mod error;
pub mod inputs;

pub use config::{LogConfig, ManifestConfig, ProjectConfig, CONFIG_FILE_NAME};
pub use error::{ConfigError, ValidationError};
pub use inputs::{
    check_inputs_exist, check_output_writable, resolve_inputs, resolve_output,
    DEFAULT_OUTPUT_NAME, MIN_MERGE_INPUTS,
};
