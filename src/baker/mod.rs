// src/baker/mod.rs

//! Baker process supervision.
//!
//! - [`params`] holds the launch inputs.
//! - [`command`] turns them into the exact baker command line.
//! - [`output`] decides where stdout/stderr go.
//! - [`signal`] delivers SIGTERM/SIGKILL through a swappable [`Signaller`].
//! - [`process`] owns the spawned process and the graceful-then-forced
//!   shutdown.

pub mod command;
pub mod output;
pub mod params;
pub mod process;
pub mod signal;

pub use command::BakerCommand;
pub use output::LogPaths;
pub use params::BakerParams;
pub use process::{Baker, Launcher, ProcessState, ShutdownOutcome, TERM_TIMEOUT};
pub use signal::{NixSignaller, SignalDelivery, Signaller, StopSignal};
