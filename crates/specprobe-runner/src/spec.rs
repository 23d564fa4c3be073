//! OpenAPI document loading: base URL and the ordered (path, method) pairs
//!
//! Only the first `servers` entry and the keys under each path item are read.
//! Operation bodies are skipped without being interpreted.
//!
//! Not every path-item key is an operation: `summary`, `description`,
//! `parameters`, `servers`, `$ref` and `x-` extensions are skipped rather than
//! sent as methods. Repeated keys are tolerated and produce a single entry.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

use specprobe_core::{Endpoint, HttpMethod};

/// Path-item keys that are not operations.
const NON_OPERATION_KEYS: &[&str] = &["summary", "description", "parameters", "servers", "$ref"];

/// Parsed specification document. Loaded once per run, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecDocument {
    #[serde(default)]
    servers: Option<Vec<Server>>,
    #[serde(default)]
    paths: Option<Paths>,
}

/// Entry of the top-level `servers` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Server {
    pub url: String,
}

/// Input format of a spec document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Yaml,
    Json,
    /// Sniff from content: leading `{` means JSON, anything else YAML
    Detect,
}

impl SpecFormat {
    /// Pick the format from a file extension (`.yaml`/`.yml`/`.json`).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Self::Yaml,
            "json" => Self::Json,
            _ => Self::Detect,
        }
    }
}

impl SpecDocument {
    /// Read and parse the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read and
    /// [`LoadError::Parse`] if it is not well-formed.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoadError::Io(path.to_path_buf(), e.to_string()))?;
        Self::parse(&content, SpecFormat::from_path(path))
    }

    /// Parse a document from memory.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] if the content is not well-formed or
    /// `servers`/`paths` have the wrong shape.
    pub fn parse(content: &str, format: SpecFormat) -> Result<Self, LoadError> {
        let format = match format {
            SpecFormat::Detect if content.trim_start().starts_with('{') => SpecFormat::Json,
            SpecFormat::Detect => SpecFormat::Yaml,
            other => other,
        };

        match format {
            SpecFormat::Json => serde_json::from_str(content)
                .map_err(|e| LoadError::Parse(format!("Invalid JSON: {e}"))),
            _ => serde_yml::from_str(content)
                .map_err(|e| LoadError::Parse(format!("Invalid YAML: {e}"))),
        }
    }

    /// URL of the first server entry. Later entries are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingServers`] if `servers` is absent or empty and
    /// [`LoadError::EmptyServerUrl`] if the first url is blank.
    pub fn base_url(&self) -> Result<&str, LoadError> {
        let server = self
            .servers
            .as_deref()
            .and_then(<[Server]>::first)
            .ok_or(LoadError::MissingServers)?;

        if server.url.trim().is_empty() {
            return Err(LoadError::EmptyServerUrl);
        }
        Ok(&server.url)
    }

    /// All declared endpoints, in document order: paths first, then each
    /// path's method keys. Computed fresh on every call.
    #[must_use]
    pub fn enumerate_endpoints(&self) -> Vec<Endpoint> {
        let Some(paths) = &self.paths else {
            return Vec::new();
        };

        paths
            .0
            .iter()
            .flat_map(|item| {
                item.keys
                    .iter()
                    .filter(|key| is_operation_key(key))
                    .map(move |key| Endpoint::new(item.path.clone(), HttpMethod::parse(key)))
            })
            .collect()
    }
}

fn is_operation_key(key: &str) -> bool {
    !NON_OPERATION_KEYS.contains(&key) && !key.starts_with("x-")
}

/// `paths` in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Paths(Vec<PathItem>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct PathItem {
    path: String,
    keys: Vec<String>,
}

/// Keys of one path item, in document order. A null item has none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ItemKeys(Vec<String>);

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathsVisitor;

        impl<'de> Visitor<'de> for PathsVisitor {
            type Value = Paths;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of path to path item")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Paths, A::Error> {
                let mut items: Vec<PathItem> = Vec::new();
                while let Some(path) = map.next_key::<String>()? {
                    let keys = map.next_value::<Option<ItemKeys>>()?.unwrap_or_default().0;
                    // Repeated path: the later item wins, the first position is kept
                    match items.iter_mut().find(|item| item.path == path) {
                        Some(existing) => existing.keys = keys,
                        None => items.push(PathItem { path, keys }),
                    }
                }
                Ok(Paths(items))
            }
        }

        deserializer.deserialize_map(PathsVisitor)
    }
}

impl<'de> Deserialize<'de> for ItemKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = ItemKeys;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of method to operation")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ItemKeys, A::Error> {
                let mut keys = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    map.next_value::<IgnoredAny>()?;
                    // A repeated method still yields one operation
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
                Ok(ItemKeys(keys))
            }
        }

        deserializer.deserialize_map(KeysVisitor)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Document declares no servers: a base URL is required")]
    MissingServers,
    #[error("First server entry has an empty url")]
    EmptyServerUrl,
}
