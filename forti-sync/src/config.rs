use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Provider-wide settings passed explicitly into every read and write.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Device firmware, used to gate version-specific fields.
    pub firmware_version: Option<String>,
    /// Read every sub-table even when the state does not declare it, unless
    /// the state sets `get_all_tables` itself.
    pub import_table: bool,
    /// Ordering applied to sub-tables when the state does not choose one.
    pub dynamic_sort_subtable: String,
    /// VDOM query parameter for requests that do not name one.
    pub vdom: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            firmware_version: None,
            import_table: true,
            dynamic_sort_subtable: "false".to_string(),
            vdom: None,
        }
    }
}

/// Errors returned when loading a provider config file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load provider settings from a TOML file. Missing keys take defaults.
pub fn load_config(path: &Path) -> Result<ProviderConfig, ConfigLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigLoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}
