// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{BakerConfig, RawBakerConfig};
use crate::errors::Result;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Baker.toml";

/// Read and deserialize a config file without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawBakerConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawBakerConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a config file and validate it.
///
/// Path preconditions (executable and directories exist) are not checked
/// here; they are checked when the baker is launched.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BakerConfig> {
    let raw_config = load_from_path(&path)?;
    let config = BakerConfig::try_from(raw_config)?;
    Ok(config)
}

/// [`DEFAULT_CONFIG_FILE`] in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
