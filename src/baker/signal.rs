// src/baker/signal.rs

//! Stop signals and the seam used to deliver them.
//!
//! The baker only ever receives two signals: SIGTERM to ask it to exit and
//! SIGKILL when it did not. Delivery goes through [`Signaller`] so tests can
//! observe which signals were sent; [`NixSignaller`] is the real thing.

use std::fmt;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::debug;

use crate::errors::{Result, SupervisorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopSignal {
    /// SIGTERM; the process may handle, delay or ignore it.
    Graceful,
    /// SIGKILL; enforced by the kernel.
    Forced,
}

impl StopSignal {
    pub fn as_nix(self) -> Signal {
        match self {
            StopSignal::Graceful => Signal::SIGTERM,
            StopSignal::Forced => Signal::SIGKILL,
        }
    }
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_nix().as_str())
    }
}

/// What happened when a stop signal was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDelivery {
    Delivered,
    /// The process had already been reaped or no longer exists.
    AlreadyGone,
}

/// Sends a signal to a pid.
pub trait Signaller: Send + Sync + fmt::Debug {
    fn send(&self, pid: u32, signal: StopSignal) -> std::result::Result<(), Errno>;
}

/// Production signaller backed by `kill(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignaller;

impl Signaller for NixSignaller {
    fn send(&self, pid: u32, signal: StopSignal) -> std::result::Result<(), Errno> {
        // pid 0 and negative pids address process groups; never allow those.
        let raw = i32::try_from(pid).map_err(|_| Errno::EINVAL)?;
        if raw <= 0 {
            return Err(Errno::EINVAL);
        }
        kill(Pid::from_raw(raw), signal.as_nix())
    }
}

/// Issue `signal` to `pid`, treating a vanished process as a no-op.
///
/// `pid` is `None` once the child has been reaped; the pid may since have
/// been recycled, so nothing is sent.
pub fn deliver(
    signaller: &dyn Signaller,
    pid: Option<u32>,
    signal: StopSignal,
) -> Result<SignalDelivery> {
    let Some(pid) = pid else {
        debug!(%signal, "child already reaped; not signalling");
        return Ok(SignalDelivery::AlreadyGone);
    };

    match signaller.send(pid, signal) {
        Ok(()) => {
            debug!(pid, %signal, "signal delivered");
            Ok(SignalDelivery::Delivered)
        }
        Err(Errno::ESRCH) => {
            debug!(pid, %signal, "no such process; treating as already exited");
            Ok(SignalDelivery::AlreadyGone)
        }
        Err(source) => Err(SupervisorError::SignalError {
            signal,
            pid,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Scripted(Mutex<Vec<std::result::Result<(), Errno>>>);

    impl Signaller for Scripted {
        fn send(&self, _pid: u32, _signal: StopSignal) -> std::result::Result<(), Errno> {
            self.0.lock().unwrap().remove(0)
        }
    }

    #[test]
    fn signals_map_to_term_and_kill() {
        assert_eq!(StopSignal::Graceful.as_nix(), Signal::SIGTERM);
        assert_eq!(StopSignal::Forced.as_nix(), Signal::SIGKILL);
        assert_eq!(StopSignal::Graceful.to_string(), "SIGTERM");
        assert_eq!(StopSignal::Forced.to_string(), "SIGKILL");
    }

    #[test]
    fn esrch_is_swallowed() {
        let s = Scripted(Mutex::new(vec![Err(Errno::ESRCH)]));
        let d = deliver(&s, Some(1234), StopSignal::Forced).unwrap();
        assert_eq!(d, SignalDelivery::AlreadyGone);
    }

    #[test]
    fn reaped_child_is_never_signalled() {
        let s = Scripted(Mutex::new(Vec::new()));
        let d = deliver(&s, None, StopSignal::Graceful).unwrap();
        assert_eq!(d, SignalDelivery::AlreadyGone);
    }

    #[test]
    fn other_errors_propagate() {
        let s = Scripted(Mutex::new(vec![Err(Errno::EPERM)]));
        match deliver(&s, Some(1), StopSignal::Graceful) {
            Err(SupervisorError::SignalError { signal, pid, source }) => {
                assert_eq!(signal, StopSignal::Graceful);
                assert_eq!(pid, 1);
                assert_eq!(source, Errno::EPERM);
            }
            other => panic!("expected SignalError, got {other:?}"),
        }
    }

    #[test]
    fn nix_signaller_rejects_group_pids() {
        assert_eq!(NixSignaller.send(0, StopSignal::Graceful), Err(Errno::EINVAL));
        assert_eq!(
            NixSignaller.send(u32::MAX, StopSignal::Graceful),
            Err(Errno::EINVAL)
        );
    }
}
