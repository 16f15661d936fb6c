use nix::sys::signal::Signal;
use nix::unistd::Pid;
use tracing::{debug, warn};

use super::job::Job;
use super::signal::send_signal;
use super::state::ProcessState;
use super::wait::poll_finished;

/// A child collected by `reap_finished`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Completion {
    pub pid: Pid,
    pub state: ProcessState,
}

impl std::fmt::Display for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Background pid {} is done: {}", self.pid, self.state)
    }
}

/// Background jobs that have not been seen to terminate yet.
///
/// Every pid held here belongs to a live or not-yet-reaped child. Dropping
/// the registry kills whatever is left, so no job outlives its shell.
#[derive(Debug, Default)]
pub struct BackgroundRegistry {
    jobs: Vec<Job>,
}

impl BackgroundRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, job: Job) {
        debug!("registering background job {} ({})", job.pid, job.cmd);
        self.jobs.push(job);
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.jobs.iter().any(|job| job.pid == pid)
    }

    pub fn pids(&self) -> Vec<Pid> {
        self.jobs.iter().map(|job| job.pid).collect()
    }

    /// Collects every child that has terminated, without blocking.
    ///
    /// The wait is process-wide, so children that were never registered
    /// are reported too. Registered ones are dropped from the registry
    /// before their pid can be reused.
    pub fn reap_finished(&mut self) -> Vec<Completion> {
        let mut completed = Vec::new();
        while let Some((pid, state)) = poll_finished() {
            let before = self.jobs.len();
            self.jobs.retain(|job| job.pid != pid);
            if self.jobs.len() == before {
                debug!("reaped unregistered child {}", pid);
            }
            completed.push(Completion { pid, state });
        }
        completed
    }

    /// Sends SIGKILL to every registered job and forgets them all.
    /// Does not wait; jobs that already exited are skipped silently.
    pub fn terminate_all(&mut self) {
        for job in self.jobs.drain(..) {
            debug!("Terminating background job {} ({})", job.pid, job.cmd);
            if let Err(e) = send_signal(job.pid, Signal::SIGKILL) {
                warn!("failed to kill background job {}: {}", job.pid, e);
            }
        }
    }
}

impl Drop for BackgroundRegistry {
    fn drop(&mut self) {
        self.terminate_all();
    }
}
