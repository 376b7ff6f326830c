// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

use crate::baker::signal::StopSignal;

#[derive(Error, Debug)]
pub enum SupervisorError {
    /// A launch precondition or config value is invalid. No process exists.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The OS refused to start the baker, or its log sinks could not be opened.
    #[error("Launch error for '{}': {source}", .program.display())]
    LaunchError {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Signal delivery failed for a reason other than "no such process".
    #[error("Signal error: failed to send {signal} to pid {pid}: {source}")]
    SignalError {
        signal: StopSignal,
        pid: u32,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
