use nix::unistd::Pid;
use psh_types::{APP_NAME, Context, ExitStatus, ParseError};
use tracing::{debug, error};

use super::fork::{PreparedCommand, fork_process};
use super::registry::BackgroundRegistry;
use super::setup::ChildSetup;
use super::wait::wait_pid_job;
use crate::parser::ExecutionIntent;

/// One spawned external process. A job is consumed either by `wait`
/// (foreground) or by `BackgroundRegistry::insert` (background).
#[must_use = "a job must be waited on or handed to the background registry"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub pid: Pid,
    pub background: bool,
    pub cmd: String,
}

impl Job {
    pub fn new(pid: Pid, background: bool, cmd: String) -> Self {
        Job {
            pid,
            background,
            cmd,
        }
    }

    /// Blocks until the process ends and reports how.
    pub fn wait(self) -> ExitStatus {
        let state = wait_pid_job(self.pid);
        debug!("job {} ({}) finished: {}", self.pid, self.cmd, state);
        state.into()
    }
}

/// Forks and execs `intent`.
///
/// Background jobs are registered and announced and the call returns
/// `Running` at once. Foreground jobs are waited for. A failed fork is
/// reported and yields `Unchanged` so the previous status survives.
pub fn launch(
    ctx: &Context,
    intent: &ExecutionIntent,
    jobs: &mut BackgroundRegistry,
) -> Result<ExitStatus, ParseError> {
    let setup = ChildSetup::plan(intent)?;
    let command = PreparedCommand::new(intent)?;

    let pid = match fork_process(&command, &setup) {
        Ok(pid) => pid,
        Err(err) => {
            error!("failed to launch {}: {:?}", intent.program, err);
            ctx.write_stderr(&format!("{APP_NAME}: Error forking!")).ok();
            return Ok(ExitStatus::Unchanged);
        }
    };

    let job = Job::new(pid, intent.background, intent.program.clone());
    if job.background {
        ctx.write_stdout(&format!("Background pid {pid} has begun.")).ok();
        jobs.insert(job);
        Ok(ExitStatus::Running(pid))
    } else {
        Ok(job.wait())
    }
}
