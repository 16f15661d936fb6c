use anyhow::{Context as _, Result};
use nix::unistd::chdir;
use psh_builtin::{ShellProxy, get_command};
use psh_types::{Context, ExitStatus, ShellStatus};
use tracing::{debug, warn};

use crate::errors::display_user_error;
use crate::parser::{ExecutionIntent, is_blank_or_comment, tokenize};
use crate::process::signal::ignore_sigint;
use crate::process::{BackgroundRegistry, Completion, launch};

pub struct Shell {
    pub status: ShellStatus,
    pub exited: bool,
    pub(crate) wait_jobs: BackgroundRegistry,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("status", &self.status)
            .field("jobs", &self.wait_jobs.len())
            .finish()
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Shell {
            status: ShellStatus::new(),
            exited: false,
            wait_jobs: BackgroundRegistry::new(),
        }
    }

    /// The shell itself ignores SIGINT; children get it back in their setup.
    pub fn set_signals(&mut self) {
        if let Err(e) = ignore_sigint() {
            warn!("Failed to set SIGINT handler: {}", e);
        }
    }

    pub fn jobs(&self) -> &BackgroundRegistry {
        &self.wait_jobs
    }

    /// Tokenizes and dispatches one input line.
    pub fn eval_str(&mut self, ctx: &Context, line: &str) -> bool {
        match tokenize(line) {
            Ok(tokens) => self.dispatch(ctx, &tokens),
            Err(err) => {
                display_user_error(ctx, &anyhow::Error::from(err));
                self.status.record(ExitStatus::ExitedWith(1));
                true
            }
        }
    }

    /// Runs one command. Returns false when the shell should stop.
    ///
    /// Blank lines and comments do nothing. Builtins run in-process;
    /// anything else is launched as a child. Only foreground results and
    /// builtin failures reach `status`.
    pub fn dispatch(&mut self, ctx: &Context, tokens: &[String]) -> bool {
        if is_blank_or_comment(tokens) {
            return true;
        }

        let status = match get_command(&tokens[0]) {
            Some(builtin) => {
                debug!("dispatch builtin {}", tokens[0]);
                builtin(ctx, tokens.to_vec(), self)
            }
            None => self.launch_external(ctx, tokens),
        };
        debug!("dispatch {:?} -> {:?}", tokens, status);

        self.status.record(status);
        status != ExitStatus::Exit
    }

    fn launch_external(&mut self, ctx: &Context, tokens: &[String]) -> ExitStatus {
        let result = ExecutionIntent::from_tokens(tokens)
            .and_then(|intent| launch(ctx, &intent, &mut self.wait_jobs));
        match result {
            Ok(status) => status,
            Err(err) => {
                display_user_error(ctx, &anyhow::Error::from(err));
                ExitStatus::ExitedWith(1)
            }
        }
    }

    /// Reports and forgets background jobs that have finished.
    pub fn reap_background(&mut self, ctx: &Context) -> Vec<Completion> {
        let completed = self.wait_jobs.reap_finished();
        for done in &completed {
            ctx.write_stdout(&done.to_string()).ok();
        }
        completed
    }

    pub fn terminate_background_jobs(&mut self) {
        self.wait_jobs.terminate_all();
    }
}

impl ShellProxy for Shell {
    fn exit_shell(&mut self) {
        debug!("exit requested");
        self.exited = true;
    }

    fn changepwd(&mut self, path: &str) -> Result<()> {
        chdir(path).with_context(|| format!("failed chdir {path}"))?;
        Ok(())
    }

    fn get_var(&mut self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn last_status(&self) -> ShellStatus {
        self.status
    }
}
