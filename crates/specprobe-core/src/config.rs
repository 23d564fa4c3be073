//! Project configuration for the specprobe CLI

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// OpenAPI spec path (local file)
    #[serde(default = "default_spec")]
    pub spec: PathBuf,

    /// Write the JSON run report here
    #[serde(default)]
    pub report: Option<PathBuf>,

    /// Write `.http` reproductions of non-passing cases here
    #[serde(default)]
    pub reproductions: Option<PathBuf>,
}

fn default_spec() -> PathBuf {
    PathBuf::from("openapi.yaml")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spec: default_spec(),
            report: None,
            reproductions: None,
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from default location (.specprobe.toml)
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."))
    }

    /// Load the first config candidate found in `dir`, or defaults.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let candidates = [".specprobe.toml", ".specprobe.json", "specprobe.toml"];

        for name in candidates {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        // No config file, return default
        Ok(Self::default())
    }

    /// Create example config file
    pub fn example() -> &'static str {
        r#"# specprobe configuration

# OpenAPI spec (local file path). The first `servers` entry is the target.
spec = "openapi.yaml"

# Write the full run report as JSON
# report = ".specprobe/report.json"

# Write .http reproductions of failing or erroring endpoints
# reproductions = ".specprobe/reproductions.http"
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
