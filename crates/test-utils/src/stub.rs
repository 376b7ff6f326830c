//! Stub baker executables for process-level tests.
//!
//! Each stub is a `/bin/sh` script in its own temp dir, next to a client
//! (`base_dir`) and node (`node_dir`) directory. On start it writes its argv
//! (one per line) to `args`, prints one line to each output stream, installs
//! its SIGTERM behaviour and then touches `ready`.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use baker_supervisor::baker::{Baker, BakerParams, Launcher};
use baker_supervisor::errors::{Result, SupervisorError};
use nix::errno::Errno;
use tempfile::TempDir;

pub const STDOUT_LINE: &str = "stub baker stdout";
pub const STDERR_LINE: &str = "stub baker stderr";

/// How the stub reacts once it is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubBehaviour {
    /// Keeps running; SIGTERM has its default (fatal) effect.
    DefaultTerm,
    /// Traps SIGTERM and exits with the given code.
    ExitOnTerm(i32),
    /// Ignores SIGTERM; only SIGKILL stops it.
    IgnoreTerm,
    /// Exits on its own with the given code.
    Exits(i32),
}

impl StubBehaviour {
    fn trap_line(self) -> String {
        match self {
            StubBehaviour::DefaultTerm | StubBehaviour::Exits(_) => String::new(),
            StubBehaviour::ExitOnTerm(code) => format!("trap 'exit {code}' TERM"),
            StubBehaviour::IgnoreTerm => "trap '' TERM".to_string(),
        }
    }

    fn tail(self) -> String {
        match self {
            StubBehaviour::Exits(code) => format!("exit {code}"),
            _ => "while true; do sleep 0.05; done".to_string(),
        }
    }
}

pub struct StubBaker {
    dir: TempDir,
    pub executable: PathBuf,
    pub base_dir: PathBuf,
    pub node_dir: PathBuf,
}

impl StubBaker {
    pub fn new(behaviour: StubBehaviour) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let base_dir = dir.path().join("client");
        let node_dir = dir.path().join("node");
        fs::create_dir(&base_dir)?;
        fs::create_dir(&node_dir)?;

        let executable = dir.path().join("octez-baker-stub");
        let script = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$@\" > '{args}'\n\
             {trap}\n\
             echo '{out}'\n\
             echo '{err}' >&2\n\
             : > '{ready}'\n\
             {tail}\n",
            args = dir.path().join("args").display(),
            trap = behaviour.trap_line(),
            out = STDOUT_LINE,
            err = STDERR_LINE,
            ready = dir.path().join("ready").display(),
            tail = behaviour.tail(),
        );
        fs::write(&executable, script)?;
        fs::set_permissions(&executable, fs::Permissions::from_mode(0o755))?;

        Ok(Self {
            dir,
            executable,
            base_dir,
            node_dir,
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn params(&self, rpc_port: u16, account: &str) -> BakerParams {
        BakerParams::new(
            &self.executable,
            rpc_port,
            &self.base_dir,
            &self.node_dir,
            account,
        )
    }

    /// Arguments the stub was started with, excluding argv[0].
    pub fn recorded_args(&self) -> io::Result<Vec<String>> {
        let raw = fs::read_to_string(self.dir.path().join("args"))?;
        Ok(raw.lines().map(str::to_string).collect())
    }

    pub fn is_ready(&self) -> bool {
        self.dir.path().join("ready").exists()
    }

    /// Poll until the stub has installed its signal handling.
    pub async fn wait_until_ready(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.is_ready() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.is_ready()
    }
}

/// Launch, retrying while the kernel reports the freshly written stub as
/// busy (`ETXTBSY`), which happens when a concurrent test forks while the
/// script is still open for writing.
pub async fn launch_stub(launcher: &Launcher, params: BakerParams) -> Result<Baker> {
    let mut attempts = 0;
    loop {
        match launcher.launch(params.clone()) {
            Err(SupervisorError::LaunchError { source, .. })
                if source.raw_os_error() == Some(Errno::ETXTBSY as i32) && attempts < 20 =>
            {
                attempts += 1;
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
            other => return other,
        }
    }
}
