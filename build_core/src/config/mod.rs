//! Configuration loading from TOML files

mod constants;
mod tables;

pub use constants::{ClassConstants, GameConstants};
pub use tables::{
    default_cube_catalog, default_line_catalog, default_scroll_table, load_cube_catalog,
    load_line_catalog, load_scroll_table, parse_cube_catalog, parse_line_catalog,
    parse_scroll_table,
};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error. Each variant names the table being loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {table} from {}: {source}", path.display())]
    IoError {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {table}: {source}")]
    ParseError {
        table: &'static str,
        #[source]
        source: toml::de::Error,
    },
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Prefix a validation message with the table it came from
    fn in_table(self, table: &str) -> ConfigError {
        match self {
            ConfigError::ValidationError(message) => {
                ConfigError::ValidationError(format!("{table}: {message}"))
            }
            other => other,
        }
    }
}

/// Load a TOML file and deserialize it as `table`
pub fn load_toml<T: serde::de::DeserializeOwned>(
    path: &Path,
    table: &'static str,
) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        table,
        path: path.to_path_buf(),
        source,
    })?;
    parse_toml(&content, table)
}

/// Deserialize a TOML string as `table`
pub fn parse_toml<T: serde::de::DeserializeOwned>(
    content: &str,
    table: &'static str,
) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::ParseError { table, source })
}
