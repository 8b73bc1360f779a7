use std::path::{Path, PathBuf};

use crate::args::DEFAULT_CONFIG_FILES;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Loads a configuration file from the provided path or default locations.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> AppResult<Option<ConfigFile>> {
    if let Some(path) = path {
        let path = PathBuf::from(path);
        return Ok(Some(load_config_file(&path)?));
    }

    for candidate in DEFAULT_CONFIG_FILES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            return Ok(Some(load_config_file(&path)?));
        }
    }

    Ok(None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub(crate) fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        AppError::config(ConfigError::UnknownFormat {
            path: path.to_path_buf(),
        })
    })?;
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::Unreadable {
            path: path.to_path_buf(),
            source: err,
        })
    })?;

    let parsed = match format {
        ConfigFormat::Toml => toml::from_str(&content).map_err(|err| ConfigError::Toml {
            path: path.to_path_buf(),
            source: err,
        }),
        ConfigFormat::Json => serde_json::from_str(&content).map_err(|err| ConfigError::Json {
            path: path.to_path_buf(),
            source: err,
        }),
    };
    parsed.map_err(AppError::config)
}
