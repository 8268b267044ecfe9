use std::path::{Path, PathBuf};

use serde::de::Error as SerdeDeError;
use tracing::info;

use super::{ConfigError, PipelineConfig, map_app_dir_error};
use crate::app_dirs;

/// Path of `config.toml` inside the app directory. Nothing is created.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    app_dirs::default_config_path().map_err(map_app_dir_error)
}

/// Load `explicit` if given, else the app-dir config if it exists, else defaults.
///
/// An explicit path must exist; the app-dir file is optional.
pub fn load_or_default(explicit: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }
    let path = config_path()?;
    if path.exists() {
        load_from_path(&path)
    } else {
        Ok(PipelineConfig::default())
    }
}

/// Parse one TOML config file. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    let config: PipelineConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}
