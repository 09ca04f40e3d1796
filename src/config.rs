//! User configuration (`config.toml`).
//!
//! ```toml
//! [grid]
//! columns = 10
//! rows = 10
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MAX_CONFIG_FILE_BYTES: u64 = 64 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Refusing to read {path}: file too large ({len} bytes, max {max})")]
    TooLarge { path: PathBuf, len: u64, max: u64 },
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub columns: usize,
    pub rows: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            columns: 10,
            rows: 10,
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "recell")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Read and parse a config file.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let meta = std::fs::metadata(path).map_err(io_err)?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            len: meta.len(),
            max: MAX_CONFIG_FILE_BYTES,
        });
    }
    let content = std::fs::read_to_string(path).map_err(io_err)?;
    parse_config(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Load the config, falling back to defaults.
///
/// An explicitly requested file that is missing is a warning; a missing
/// user config file is not. Unreadable or invalid files are warnings.
pub fn load_config(explicit: Option<&Path>, skip_user_config: bool) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();

    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if skip_user_config => None,
        None => user_config_path().filter(|p| p.exists()),
    };
    let Some(path) = path else {
        return (Config::default(), warnings);
    };

    match read_config(&path) {
        Ok(config) => (config, warnings),
        Err(err) => {
            warnings.push(err.to_string());
            (Config::default(), warnings)
        }
    }
}
