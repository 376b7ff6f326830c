use std::sync::{Arc, Mutex};

use baker_supervisor::baker::{NixSignaller, Signaller, StopSignal};
use nix::errno::Errno;

/// A signaller that:
/// - records every (pid, signal) it is asked to send
/// - forwards the signal to the real process via `kill(2)`.
#[derive(Debug, Clone, Default)]
pub struct RecordingSignaller {
    sent: Arc<Mutex<Vec<(u32, StopSignal)>>>,
}

impl RecordingSignaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(u32, StopSignal)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn signals(&self) -> Vec<StopSignal> {
        self.sent().into_iter().map(|(_, s)| s).collect()
    }

    pub fn count(&self, signal: StopSignal) -> usize {
        self.signals().into_iter().filter(|s| *s == signal).count()
    }
}

impl Signaller for RecordingSignaller {
    fn send(&self, pid: u32, signal: StopSignal) -> Result<(), Errno> {
        {
            let mut guard = self.sent.lock().unwrap();
            guard.push((pid, signal));
        }
        NixSignaller.send(pid, signal)
    }
}
