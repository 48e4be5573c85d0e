//! Configuration management for odbc-cell.
//!
//! Handles loading configuration from TOML files and environment variables,
//! with support for named connection instances and session options.

use crate::connection::KeywordSet;
use crate::error::{OdbcCellError, Result};
use crate::instance::ConnectionProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the default instance.
pub const CONN_DEFAULT_VAR: &str = "JUPYTER_ODBC_CONN_DEFAULT";

/// Prefix of environment variables holding instance URLs
/// (`JUPYTER_ODBC_CONN_URL_PROD=odbc://...` registers instance `prod`).
pub const CONN_URL_PREFIX: &str = "JUPYTER_ODBC_CONN_URL_";

/// Main configuration structure for odbc-cell.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Session options.
    #[serde(default)]
    pub options: SessionOptions,

    /// Named connection instances.
    #[serde(default)]
    pub instances: BTreeMap<String, ConnectionProfile>,
}

/// Options that shape a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Instance used when a cell names none.
    #[serde(default = "default_conn_default")]
    pub conn_default: String,

    /// Maximum number of rows displayed per result.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Keyword set for connection strings.
    #[serde(default)]
    pub keywords: KeywordSet,

    /// Verbose diagnostics while running queries.
    #[serde(default)]
    pub debug: bool,
}

/// Option names accepted by `set <option> <value>`.
pub const SETTABLE_OPTIONS: &[&str] = &["conn_default", "max_rows", "keywords", "debug"];

fn default_conn_default() -> String {
    "default".to_string()
}

fn default_max_rows() -> usize {
    1000
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            conn_default: default_conn_default(),
            max_rows: default_max_rows(),
            keywords: KeywordSet::default(),
            debug: false,
        }
    }
}

impl SessionOptions {
    /// Sets an option by name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match name {
            "conn_default" => {
                if value.is_empty() {
                    return Err(OdbcCellError::config("conn_default cannot be empty"));
                }
                self.conn_default = value.to_string();
            }
            "max_rows" => {
                self.max_rows = value
                    .parse()
                    .map_err(|_| OdbcCellError::config(format!("Invalid max_rows '{value}'")))?;
            }
            "keywords" => {
                self.keywords = KeywordSet::parse(value).ok_or_else(|| {
                    OdbcCellError::config(format!(
                        "Invalid keywords '{value}'. Expected 'base' or 'full'"
                    ))
                })?;
            }
            "debug" => {
                self.debug = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
            }
            other => {
                return Err(OdbcCellError::config(format!(
                    "Unknown option '{other}'. Expected one of: {}",
                    SETTABLE_OPTIONS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Name/value pairs for display.
    pub fn entries(&self) -> Vec<(String, String)> {
        vec![
            ("conn_default".to_string(), self.conn_default.clone()),
            ("max_rows".to_string(), self.max_rows.to_string()),
            ("keywords".to_string(), self.keywords.to_string()),
            ("debug".to_string(), self.debug.to_string()),
        ]
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("odbc-cell")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| OdbcCellError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            OdbcCellError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Overlays environment variables on the file configuration.
    ///
    /// `JUPYTER_ODBC_CONN_DEFAULT` replaces the default instance name and each
    /// `JUPYTER_ODBC_CONN_URL_<NAME>` adds or replaces instance `<name>`.
    /// Both names are lowercased.
    pub fn apply_env<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key == CONN_DEFAULT_VAR {
                if !value.trim().is_empty() {
                    self.options.conn_default = value.trim().to_lowercase();
                }
            } else if let Some(name) = key.strip_prefix(CONN_URL_PREFIX) {
                if name.is_empty() {
                    continue;
                }
                let profile = ConnectionProfile::from_url(value).map_err(|e| {
                    OdbcCellError::config(format!("{key}: {}", e.detail()))
                })?;
                debug!("Loaded instance {} from {}", name.to_lowercase(), key);
                self.instances.insert(name.to_lowercase(), profile);
            }
        }
        Ok(())
    }

    /// Overlays the process environment.
    pub fn apply_process_env(&mut self) -> Result<()> {
        self.apply_env(std::env::vars())
    }
}
