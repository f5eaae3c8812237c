//! Persisted per-project configuration
//!
//! Settings live as a JSON object under the project's `.rolebox/` directory.
//! Every command loads them at start; updates go through a shallow merge
//! that persists atomically (write a sibling temp file, then rename), so a
//! later reader never observes a partial write. There is no hidden global
//! state: callers pass the loaded `Settings` by reference into the handlers
//! that need them.

use crate::errors::{ConfigError, Result};
use crate::workspace::Workspace;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Key/value settings persisted under the project workspace.
#[derive(Debug)]
pub struct Settings {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Settings {
    /// Load persisted settings, or an empty mapping when none exist yet.
    pub fn load(workspace: &Workspace) -> Result<Self> {
        let path = workspace.config_path();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(ConfigError::Io)?;
            serde_json::from_str(&raw).map_err(|error| ConfigError::Parsing {
                message: error.to_string(),
            })?
        } else {
            debug!("No configuration at {}, starting empty", path.display());
            Map::new()
        };
        Ok(Self { path, values })
    }

    /// Shallow-merge `changes` into the current settings and persist.
    ///
    /// Existing keys not named in `changes` are left untouched.
    pub fn merge(&mut self, changes: Map<String, Value>) -> Result<()> {
        for (key, value) in changes {
            self.values.insert(key, value);
        }
        self.persist()
    }

    // Write-temp-then-rename keeps the persisted file whole at all times.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        let content =
            serde_json::to_string_pretty(&self.values).map_err(|error| ConfigError::Parsing {
                message: error.to_string(),
            })?;
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, content).map_err(ConfigError::Io)?;
        fs::rename(&temp, &self.path).map_err(ConfigError::Io)?;
        debug!("Persisted configuration to {}", self.path.display());
        Ok(())
    }

    /// Raw value lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Required value lookup; absence points the operator at `rolebox setup`.
    pub fn require(&self, key: &str) -> Result<&Value> {
        self.values.get(key).ok_or_else(|| {
            ConfigError::MissingKey {
                key: key.to_string(),
            }
            .into()
        })
    }

    /// Required string value.
    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.require(key)?.as_str().ok_or_else(|| {
            ConfigError::Parsing {
                message: format!("configuration key `{key}` must be a string"),
            }
            .into()
        })
    }

    /// Required list-of-strings value.
    pub fn require_list(&self, key: &str) -> Result<Vec<String>> {
        let items = self.require(key)?.as_array().ok_or_else(|| {
            ConfigError::Parsing {
                message: format!("configuration key `{key}` must be a list"),
            }
        })?;
        items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ConfigError::Parsing {
                        message: format!("configuration key `{key}` must contain only strings"),
                    }
                    .into()
                })
            })
            .collect()
    }
}
