// src/baker/params.rs

use std::path::PathBuf;

/// Everything needed to launch one baker process.
///
/// `params` are inserted between the global options and the
/// `run with local node` verb sequence; `run_params` are appended after the
/// account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakerParams {
    /// Path to the baker executable.
    pub executable: PathBuf,
    /// RPC port of the node the baker talks to.
    pub rpc_port: u16,
    /// Client directory (`-base-dir`).
    pub base_dir: PathBuf,
    /// Node data directory.
    pub node_dir: PathBuf,
    /// Delegate account the baker bakes for.
    pub account: String,
    pub params: Vec<String>,
    pub run_params: Vec<String>,
    /// When set, stdout/stderr go to `<log_file>.out` / `<log_file>.err`.
    pub log_file: Option<PathBuf>,
}

impl BakerParams {
    pub fn new(
        executable: impl Into<PathBuf>,
        rpc_port: u16,
        base_dir: impl Into<PathBuf>,
        node_dir: impl Into<PathBuf>,
        account: impl Into<String>,
    ) -> Self {
        Self {
            executable: executable.into(),
            rpc_port,
            base_dir: base_dir.into(),
            node_dir: node_dir.into(),
            account: account.into(),
            params: Vec::new(),
            run_params: Vec::new(),
            log_file: None,
        }
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_run_params<I, S>(mut self, run_params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_params = run_params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = Some(log_file.into());
        self
    }

    /// Loopback RPC endpoint of the node, e.g. `http://127.0.0.1:18730`.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.rpc_port)
    }
}
