// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::baker::{BakerParams, Launcher, TERM_TIMEOUT};

/// Configuration file as read from TOML, before validation.
///
/// ```toml
/// [baker]
/// executable = "./octez-baker-alpha"
/// rpc_port = 18730
/// base_dir = "/tmp/client"
/// node_dir = "/tmp/node"
/// account = "bootstrap1"
/// run_params = ["--liquidity-baking-toggle-vote", "pass"]
/// log_file = "/tmp/baker.log"
///
/// [shutdown]
/// term_timeout = "10s"
/// ```
///
/// `[shutdown]` is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBakerConfig {
    pub baker: BakerSection,

    #[serde(default)]
    pub shutdown: ShutdownSection,
}

/// `[baker]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BakerSection {
    pub executable: PathBuf,

    pub rpc_port: u16,

    /// Client directory, passed as `-base-dir`.
    pub base_dir: PathBuf,

    pub node_dir: PathBuf,

    /// Delegate account alias or address.
    pub account: String,

    /// Extra options placed before `run with local node`.
    #[serde(default)]
    pub params: Vec<String>,

    /// Extra options appended after the account.
    #[serde(default)]
    pub run_params: Vec<String>,

    /// If set, output goes to `<log_file>.out` / `<log_file>.err` instead of
    /// the console.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// `[shutdown]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ShutdownSection {
    /// Grace period after SIGTERM, e.g. `"10s"` or `"500ms"`.
    #[serde(default = "default_term_timeout")]
    pub term_timeout: String,
}

fn default_term_timeout() -> String {
    format!("{}s", TERM_TIMEOUT.as_secs())
}

impl Default for ShutdownSection {
    fn default() -> Self {
        Self {
            term_timeout: default_term_timeout(),
        }
    }
}

/// Validated configuration. Build one with `BakerConfig::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct BakerConfig {
    pub params: BakerParams,
    pub term_timeout: Duration,
}

impl BakerConfig {
    pub(crate) fn new_unchecked(baker: BakerSection, term_timeout: Duration) -> Self {
        let params = BakerParams {
            executable: baker.executable,
            rpc_port: baker.rpc_port,
            base_dir: baker.base_dir,
            node_dir: baker.node_dir,
            account: baker.account,
            params: baker.params,
            run_params: baker.run_params,
            log_file: baker.log_file,
        };
        Self {
            params,
            term_timeout,
        }
    }

    /// Launcher using the real filesystem and signals with this config's
    /// shutdown timeout.
    pub fn launcher(&self) -> Launcher {
        Launcher::new().with_term_timeout(self.term_timeout)
    }
}
