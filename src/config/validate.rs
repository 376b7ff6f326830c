// src/config/validate.rs

use crate::config::duration::parse_duration;
use crate::config::model::{BakerConfig, RawBakerConfig};
use crate::errors::{Result, SupervisorError};

/// Structural checks only; whether the paths exist is checked at launch.
impl TryFrom<RawBakerConfig> for BakerConfig {
    type Error = crate::errors::SupervisorError;

    fn try_from(raw: RawBakerConfig) -> std::result::Result<Self, Self::Error> {
        validate_baker_section(&raw)?;
        let term_timeout = validate_shutdown_section(&raw)?;
        Ok(BakerConfig::new_unchecked(raw.baker, term_timeout))
    }
}

fn validate_baker_section(raw: &RawBakerConfig) -> Result<()> {
    if raw.baker.rpc_port == 0 {
        return Err(SupervisorError::ConfigError(
            "[baker].rpc_port must be >= 1 (got 0)".to_string(),
        ));
    }
    if raw.baker.account.trim().is_empty() {
        return Err(SupervisorError::ConfigError(
            "[baker].account must not be empty".to_string(),
        ));
    }
    if raw.baker.executable.as_os_str().is_empty() {
        return Err(SupervisorError::ConfigError(
            "[baker].executable must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_shutdown_section(raw: &RawBakerConfig) -> Result<std::time::Duration> {
    let timeout = parse_duration(&raw.shutdown.term_timeout).map_err(|e| {
        SupervisorError::ConfigError(format!("[shutdown].term_timeout: {e}"))
    })?;
    if timeout.is_zero() {
        return Err(SupervisorError::ConfigError(
            "[shutdown].term_timeout must be greater than zero".to_string(),
        ));
    }
    Ok(timeout)
}
