//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Burnish has two configuration scopes:
//! - **Global**: user-level settings
//! - **Project**: per-directory overrides
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//!
//! # Locations
//!
//! Global, searched in order:
//! 1. `$BURNISH_CONFIG` if set
//! 2. `<config dir>/burnish/config.toml` (e.g. `~/.config/burnish/config.toml`)
//!
//! Project: `.burnish/config.toml` under the working directory.
//!
//! # Example
//!
//! ```toml
//! [remote]
//! path = "/srv/burnish-remote"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::session::SESSION_DIR;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Remote publishing target settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Directory the file-backed remote stores commits under.
    pub path: PathBuf,
}

/// One configuration scope (global or project); identical schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Remote publishing target.
    pub remote: Option<RemoteConfig>,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence automatically: project overrides
/// global.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration.
    pub global: ConfigFile,
    /// Project configuration (if present).
    pub project: Option<ConfigFile>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Missing files are not errors; unreadable or malformed files are.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let global = match global_config_path() {
            Some(path) => load_file(&path)?.unwrap_or_default(),
            None => ConfigFile::default(),
        };
        let project = load_file(&cwd.join(SESSION_DIR).join("config.toml"))?;
        Ok(Self { global, project })
    }

    /// The effective remote settings, if any scope configures one.
    pub fn remote(&self) -> Option<&RemoteConfig> {
        self.project
            .as_ref()
            .and_then(|p| p.remote.as_ref())
            .or(self.global.remote.as_ref())
    }
}

/// Resolve the global config file path.
fn global_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("BURNISH_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("burnish").join("config.toml"))
}

/// Load and parse one config file; `Ok(None)` if it does not exist.
fn load_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&raw)
        .map(Some)
        .map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_remote_section() {
        let parsed: ConfigFile = toml::from_str("[remote]\npath = \"/tmp/remote\"\n").unwrap();
        assert_eq!(
            parsed.remote,
            Some(RemoteConfig {
                path: PathBuf::from("/tmp/remote")
            })
        );
    }

    #[test]
    fn empty_file_is_default() {
        let parsed: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(parsed, ConfigFile::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("unknown_key = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn project_overrides_global() {
        let config = Config {
            global: ConfigFile {
                remote: Some(RemoteConfig {
                    path: PathBuf::from("/global"),
                }),
            },
            project: Some(ConfigFile {
                remote: Some(RemoteConfig {
                    path: PathBuf::from("/project"),
                }),
            }),
        };
        assert_eq!(config.remote().unwrap().path, PathBuf::from("/project"));
    }

    #[test]
    fn global_fills_project_gaps() {
        let config = Config {
            global: ConfigFile {
                remote: Some(RemoteConfig {
                    path: PathBuf::from("/global"),
                }),
            },
            project: Some(ConfigFile::default()),
        };
        assert_eq!(config.remote().unwrap().path, PathBuf::from("/global"));
    }

    #[test]
    fn missing_project_file_loads_clean() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.project.is_none());
    }
}
