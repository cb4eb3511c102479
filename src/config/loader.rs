// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// File name looked up in the target directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "pycify.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] to also
/// parse the pinned version and compile the ignore patterns.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Default config location for a source directory: `<dir>/pycify.toml`.
pub fn default_config_path(directory: &Path) -> PathBuf {
    directory.join(CONFIG_FILE_NAME)
}

/// Load the explicit config if one was given (it must exist), otherwise the
/// directory's `pycify.toml` if present, otherwise built-in defaults.
pub fn load_for_directory(explicit: Option<&Path>, directory: &Path) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        debug!(config = %path.display(), "loading config");
        return load_and_validate(path);
    }

    let path = default_config_path(directory);
    if path.is_file() {
        debug!(config = %path.display(), "loading config");
        load_and_validate(&path)
    } else {
        Ok(ConfigFile::default())
    }
}
