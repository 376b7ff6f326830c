// src/baker/process.rs

//! Baker process lifecycle: launch, and the two-phase shutdown.

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::runtime::Handle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::command::BakerCommand;
use super::output::{LogPaths, OutputSinks};
use super::params::BakerParams;
use super::signal::{deliver, NixSignaller, SignalDelivery, Signaller, StopSignal};
use crate::errors::{Result, SupervisorError};
use crate::fs::{FileSystem, RealFileSystem};

/// How long a baker gets to react to SIGTERM before it is killed.
pub const TERM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Running; no stop signal sent yet.
    Spawned,
    /// SIGTERM sent, waiting for the process to go away.
    Terminating,
    /// Reaped.
    Exited,
    /// SIGKILL issued after the graceful wait timed out.
    Killed,
}

/// Result of [`Baker::terminate_or_kill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// The process exited (or had already exited) and was reaped.
    Exited(ExitStatus),
    /// The graceful wait timed out and SIGKILL was issued. The process has
    /// not been reaped; call [`Baker::wait`] for its final status.
    Killed(SignalDelivery),
}

impl ShutdownOutcome {
    pub fn escalated(&self) -> bool {
        matches!(self, ShutdownOutcome::Killed(_))
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        match self {
            ShutdownOutcome::Exited(status) => Some(*status),
            ShutdownOutcome::Killed(_) => None,
        }
    }
}

/// Check the launch preconditions without touching any process.
pub fn check_preconditions(fs: &dyn FileSystem, params: &BakerParams) -> Result<()> {
    if !fs.is_file(&params.executable) {
        return Err(SupervisorError::ConfigError(format!(
            "{} not a file",
            params.executable.display()
        )));
    }
    if !fs.is_dir(&params.node_dir) {
        return Err(SupervisorError::ConfigError(format!(
            "{} not a dir",
            params.node_dir.display()
        )));
    }
    if !fs.is_dir(&params.base_dir) {
        return Err(SupervisorError::ConfigError(format!(
            "{} not a dir",
            params.base_dir.display()
        )));
    }
    Ok(())
}

/// Spawns bakers.
///
/// The defaults are the real filesystem, `kill(2)` and [`TERM_TIMEOUT`];
/// each can be swapped, mostly for tests.
#[derive(Debug, Clone)]
pub struct Launcher {
    fs: Arc<dyn FileSystem>,
    signaller: Arc<dyn Signaller>,
    term_timeout: Duration,
}

impl Default for Launcher {
    fn default() -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            signaller: Arc::new(NixSignaller),
            term_timeout: TERM_TIMEOUT,
        }
    }
}

impl Launcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_signaller(mut self, signaller: Arc<dyn Signaller>) -> Self {
        self.signaller = signaller;
        self
    }

    pub fn with_term_timeout(mut self, term_timeout: Duration) -> Self {
        self.term_timeout = term_timeout;
        self
    }

    pub fn term_timeout(&self) -> Duration {
        self.term_timeout
    }

    /// Validate, build the command and spawn the baker.
    ///
    /// Needs a Tokio runtime; without one this is a [`SupervisorError::LaunchError`].
    /// Either a running baker is returned or nothing was spawned.
    pub fn launch(&self, params: BakerParams) -> Result<Baker> {
        check_preconditions(self.fs.as_ref(), &params)?;

        let command = BakerCommand::build(&params);
        info!(command = %command.render(), "launching baker");

        let launch_error = |source: std::io::Error| SupervisorError::LaunchError {
            program: params.executable.clone(),
            source,
        };

        Handle::try_current().map_err(|e| launch_error(std::io::Error::other(e)))?;

        let sinks = OutputSinks::resolve(params.log_file.as_deref()).map_err(launch_error)?;

        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .stdout(sinks.stdout)
            .stderr(sinks.stderr)
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(launch_error)?;
        let pid = child.id().ok_or_else(|| {
            launch_error(std::io::Error::other(
                "baker exited before its pid could be read",
            ))
        })?;

        info!(pid, "baker started");

        Ok(Baker {
            params,
            command,
            log_paths: sinks.log_paths,
            child,
            pid,
            state: ProcessState::Spawned,
            exit_status: None,
            kill_delivery: None,
            term_timeout: self.term_timeout,
            signaller: Arc::clone(&self.signaller),
        })
    }
}

/// A running (or stopped) baker process, owned exclusively by this handle.
///
/// Dropping a handle whose process is still running kills the process.
#[derive(Debug)]
pub struct Baker {
    params: BakerParams,
    command: BakerCommand,
    log_paths: Option<LogPaths>,
    child: Child,
    pid: u32,
    state: ProcessState,
    exit_status: Option<ExitStatus>,
    kill_delivery: Option<SignalDelivery>,
    term_timeout: Duration,
    signaller: Arc<dyn Signaller>,
}

impl Baker {
    /// Launch with the default [`Launcher`].
    pub fn spawn(params: BakerParams) -> Result<Self> {
        Launcher::default().launch(params)
    }

    /// OS pid recorded at spawn time.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn params(&self) -> &BakerParams {
        &self.params
    }

    pub fn command(&self) -> &BakerCommand {
        &self.command
    }

    pub fn log_paths(&self) -> Option<&LogPaths> {
        self.log_paths.as_ref()
    }

    pub fn term_timeout(&self) -> Duration {
        self.term_timeout
    }

    /// Reap the process if it has exited, without blocking.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        if let Some(status) = self.exit_status {
            return Ok(Some(status));
        }
        let status = self.child.try_wait()?;
        if let Some(status) = status {
            self.record_exit(status);
        }
        Ok(status)
    }

    pub fn is_running(&mut self) -> Result<bool> {
        Ok(self.try_wait()?.is_none())
    }

    /// Wait for the process to exit, with no time limit.
    ///
    /// Use this for natural exits, or after an escalated shutdown to obtain
    /// the final status.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        if let Some(status) = self.exit_status {
            return Ok(status);
        }
        let status = self.child.wait().await?;
        self.record_exit(status);
        Ok(status)
    }

    /// Stop the baker: SIGTERM, wait up to the term timeout, then SIGKILL.
    ///
    /// Returns the exit status if the process went away in time, otherwise
    /// the outcome of issuing SIGKILL. Calling this again after a shutdown
    /// never sends a signal to a reaped process.
    pub async fn terminate_or_kill(&mut self) -> Result<ShutdownOutcome> {
        if let Some(status) = self.exit_status {
            debug!(pid = self.pid, "baker already reaped; nothing to stop");
            return Ok(ShutdownOutcome::Exited(status));
        }
        if self.state == ProcessState::Killed {
            return self.confirm_kill().await;
        }

        let timeout_ms = u64::try_from(self.term_timeout.as_millis()).unwrap_or(u64::MAX);
        info!(pid = self.pid, timeout_ms, "sending SIGTERM to baker");

        deliver(self.signaller.as_ref(), self.child.id(), StopSignal::Graceful)?;
        self.state = ProcessState::Terminating;

        match timeout(self.term_timeout, self.child.wait()).await {
            Ok(Ok(status)) => {
                self.record_exit(status);
                info!(
                    pid = self.pid,
                    exit_code = status.code(),
                    signal = status.signal(),
                    "baker exited after SIGTERM"
                );
                Ok(ShutdownOutcome::Exited(status))
            }
            Ok(Err(err)) => {
                warn!(pid = self.pid, error = %err, "waiting for baker failed; sending SIGKILL");
                let kill = self.force_kill();
                Err(wait_failure(self.pid, err, kill))
            }
            Err(_elapsed) => {
                warn!(
                    pid = self.pid,
                    timeout_ms,
                    "baker did not exit after SIGTERM; sending SIGKILL"
                );
                let delivery = self.force_kill()?;
                Ok(ShutdownOutcome::Killed(delivery))
            }
        }
    }

    fn force_kill(&mut self) -> Result<SignalDelivery> {
        let delivery = deliver(self.signaller.as_ref(), self.child.id(), StopSignal::Forced)?;
        self.state = ProcessState::Killed;
        self.kill_delivery = Some(delivery);
        Ok(delivery)
    }

    /// Second shutdown after an escalation: no new signal, just try to reap.
    async fn confirm_kill(&mut self) -> Result<ShutdownOutcome> {
        match timeout(self.term_timeout, self.child.wait()).await {
            Ok(status) => {
                let status = status?;
                self.record_exit(status);
                Ok(ShutdownOutcome::Exited(status))
            }
            Err(_elapsed) => {
                warn!(pid = self.pid, "killed baker still not reaped");
                Ok(ShutdownOutcome::Killed(
                    self.kill_delivery.unwrap_or(SignalDelivery::Delivered),
                ))
            }
        }
    }

    fn record_exit(&mut self, status: ExitStatus) {
        debug!(pid = self.pid, %status, "baker reaped");
        self.exit_status = Some(status);
        if self.state != ProcessState::Killed {
            self.state = ProcessState::Exited;
        }
    }
}

/// The error reported when waiting failed; a failed SIGKILL is only logged.
fn wait_failure(
    pid: u32,
    wait_err: std::io::Error,
    kill: Result<SignalDelivery>,
) -> SupervisorError {
    if let Err(kill_err) = kill {
        warn!(pid, error = %kill_err, "SIGKILL after failed wait also failed");
    }
    SupervisorError::IoError(wait_err)
}
