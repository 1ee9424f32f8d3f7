//! CLI configuration loaded from TOML.
//!
//! ```toml
//! format = "json"
//! show_tokens = false
//! color = false
//! history_file = "/tmp/tinysql_history"
//! ```
//!
//! Lookup order: an explicit path, `./tinysql.toml`, then
//! `<config dir>/tinysql/config.toml`. Missing files fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SqlError, SqlResult};

pub const LOCAL_CONFIG_FILE: &str = "tinysql.toml";

/// How the CLI renders tokens and trees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub format: OutputFormat,
    pub show_tokens: bool,
    pub show_cst: bool,
    pub show_ast: bool,
    pub color: bool,
    /// REPL history; defaults to `~/.tinysql_history`.
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_tokens: true,
            show_cst: true,
            show_ast: true,
            color: true,
            history_file: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> SqlResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file that must exist.
    pub fn from_file(path: &Path) -> SqlResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| SqlError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the configuration for this run.
    pub fn load(explicit: Option<&Path>) -> SqlResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for candidate in Self::search_paths() {
            if candidate.exists() {
                debug!(path = %candidate.display(), "loading config");
                return Self::from_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("tinysql").join("config.toml"));
        }
        paths
    }

    /// Where the REPL keeps its history.
    pub fn history_path(&self) -> PathBuf {
        self.history_file.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|p| p.join(".tinysql_history"))
                .unwrap_or_default()
        })
    }
}
