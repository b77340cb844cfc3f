//! Project configuration.
//!
//! The file is optional. Every field has a default and unknown fields are
//! ignored, so configs written for other commands of the tool still load.

use std::path::{Path, PathBuf};

use apex_codec::{EncodeOptions, DEFAULT_API_VERSION, METADATA_NAMESPACE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Name of the configuration file, relative to the project root.
pub const CONFIG_FILE_NAME: &str = ".apex-copilot.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Metadata API version written into merged manifests.
    #[serde(alias = "salesforceApi")]
    pub api_version: String,
    /// Root element namespace; `null` writes a bare `<Package>`.
    pub namespace: Option<String>,
    pub manifest: ManifestConfig,
    pub logs: LogConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            namespace: Some(METADATA_NAMESPACE.to_string()),
            manifest: ManifestConfig::default(),
            logs: LogConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManifestConfig {
    /// Directory holding source manifests.
    pub path: PathBuf,
    /// Directory merged manifests are written to when the output is a bare name.
    pub merged_path: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./manifest"),
            merged_path: PathBuf::from("./manifest/merged"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default tracing level (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded project config");
        Ok(config)
    }

    /// Read `.apex-copilot.json` from `root`, or defaults if there is none.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!(path = %path.display(), "no project config, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Encoder settings derived from this configuration.
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            version: self.api_version.clone(),
            namespace: self.namespace.clone(),
        }
    }
}
