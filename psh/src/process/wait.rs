use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use tracing::{debug, error, warn};

use super::state::ProcessState;

/// Blocks until `pid` exits or is killed by a signal.
///
/// Stop and continue notifications are skipped. `ECHILD` means someone
/// else already collected the child, which is reported as exit status 1.
pub fn wait_pid_job(pid: Pid) -> ProcessState {
    debug!("WAIT_PID_START: Waiting for foreground pid: {}", pid);
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(pid, status)) => {
                debug!(
                    "WAIT_PID_EXITED: Process {} exited normally with status: {}",
                    pid, status
                );
                return ProcessState::Exited(status);
            }
            Ok(WaitStatus::Signaled(pid, signal, core_dumped)) => {
                debug!(
                    "WAIT_PID_SIGNALED: Process {} killed by signal: {:?}, core_dumped: {}",
                    pid, signal, core_dumped
                );
                return ProcessState::Signaled(signal);
            }
            Ok(status) => {
                debug!("WAIT_PID_SKIP: Ignoring status {:?} for pid {}", status, pid);
            }
            Err(Errno::EINTR) => {
                debug!("WAIT_PID_EINTR: waitpid for {} interrupted, retrying", pid);
            }
            Err(Errno::ECHILD) => {
                warn!(
                    "WAIT_PID_ECHILD: No child process {} (ECHILD) - treating as exit 1",
                    pid
                );
                return ProcessState::Exited(1);
            }
            Err(e) => {
                error!("WAIT_PID_ERROR: waitpid for {} failed: {}", pid, e);
                return ProcessState::Exited(1);
            }
        }
    }
}

/// Collects one terminated child of this process, any child, without
/// blocking. Returns None once nothing is ready.
pub fn poll_finished() -> Option<(Pid, ProcessState)> {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(pid, status)) => {
                debug!("POLL_EXITED: Process {} exited with status: {}", pid, status);
                return Some((pid, ProcessState::Exited(status)));
            }
            Ok(WaitStatus::Signaled(pid, signal, _)) => {
                debug!("POLL_SIGNALED: Process {} killed by signal: {:?}", pid, signal);
                return Some((pid, ProcessState::Signaled(signal)));
            }
            Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => return None,
            Ok(status) => {
                debug!("POLL_SKIP: Ignoring status {:?}", status);
            }
            Err(Errno::EINTR) => {}
            Err(e) => {
                error!("POLL_ERROR: waitpid failed: {}", e);
                return None;
            }
        }
    }
}
