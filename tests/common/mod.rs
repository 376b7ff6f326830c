#![allow(dead_code)]

pub use baker_supervisor_test_utils::init_tracing;

/// Is there still a process (possibly a zombie) with this pid?
pub fn pid_exists(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Is the process running? Zombies count as dead.
///
/// Uses `/proc` where available and falls back to [`pid_exists`].
pub fn is_alive(pid: u32) -> bool {
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.trim_start().chars().next())
            .is_some_and(|state| state != 'Z' && state != 'X'),
        Err(_) => pid_exists(pid),
    }
}
