// src/baker/output.rs

//! Where the baker's stdout/stderr go.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::debug;

/// Files receiving the baker's output when a log path is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

impl LogPaths {
    /// `<log_file>.out` and `<log_file>.err`.
    pub fn for_log_file(log_file: &Path) -> Self {
        Self {
            stdout: with_suffix(log_file, ".out"),
            stderr: with_suffix(log_file, ".err"),
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Resolved stdio handles for one spawn.
#[derive(Debug)]
pub struct OutputSinks {
    pub stdout: Stdio,
    pub stderr: Stdio,
    pub log_paths: Option<LogPaths>,
}

impl OutputSinks {
    /// Open (truncating) the log files for `log_file`, or inherit the
    /// parent's streams when there is none.
    pub fn resolve(log_file: Option<&Path>) -> io::Result<Self> {
        let Some(log_file) = log_file else {
            return Ok(Self {
                stdout: Stdio::inherit(),
                stderr: Stdio::inherit(),
                log_paths: None,
            });
        };

        let paths = LogPaths::for_log_file(log_file);
        let stdout = File::create(&paths.stdout)?;
        let stderr = File::create(&paths.stderr)?;
        debug!(
            stdout = %paths.stdout.display(),
            stderr = %paths.stderr.display(),
            "redirecting baker output to log files"
        );

        Ok(Self {
            stdout: Stdio::from(stdout),
            stderr: Stdio::from(stderr),
            log_paths: Some(paths),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_paths_append_stream_suffixes() {
        let paths = LogPaths::for_log_file(Path::new("/tmp/logs/baker.log"));
        assert_eq!(paths.stdout, PathBuf::from("/tmp/logs/baker.log.out"));
        assert_eq!(paths.stderr, PathBuf::from("/tmp/logs/baker.log.err"));
    }

    #[test]
    fn no_log_file_means_inherited_streams() -> io::Result<()> {
        let sinks = OutputSinks::resolve(None)?;
        assert!(sinks.log_paths.is_none());
        Ok(())
    }

    #[test]
    fn log_file_creates_both_sinks() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let log = dir.path().join("baker.log");
        std::fs::write(dir.path().join("baker.log.out"), b"stale")?;

        let sinks = OutputSinks::resolve(Some(&log))?;
        let paths = sinks.log_paths.clone().expect("log paths");
        assert!(paths.stdout.is_file());
        assert!(paths.stderr.is_file());
        assert_eq!(std::fs::read(&paths.stdout)?, b"", "stale log must be truncated");
        Ok(())
    }

    #[test]
    fn missing_log_directory_is_an_error() {
        let err = OutputSinks::resolve(Some(Path::new("/nonexistent-dir/x/baker.log")));
        assert!(err.is_err());
    }
}
