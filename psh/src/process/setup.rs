use libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::fcntl::{OFlag, open};
use nix::sys::stat::Mode;
use nix::unistd::dup2;
use psh_types::{APP_NAME, ParseError};
use std::ffi::CString;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};

use super::redirect::Redirect;
use super::signal::restore_default_sigint;
use crate::parser::ExecutionIntent;

pub const NULL_DEVICE: &str = "/dev/null";

const SIGINT_RESET_FAILED: &str = "psh: Could not restore SIGINT\n";

/// Rebinds one standard descriptor of the child to a file.
///
/// Everything the child needs (C path, error text) is built before fork so
/// that applying it only makes raw system calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdRedirect {
    pub target: RawFd,
    pub path: CString,
    pub write: bool,
    open_error: String,
    dup_error: String,
}

impl FdRedirect {
    fn new(
        target: RawFd,
        path: &str,
        write: bool,
        open_error: String,
        dup_error: String,
    ) -> Result<Self, ParseError> {
        let path = CString::new(path).map_err(|_| ParseError::NulByte(path.to_string()))?;
        Ok(FdRedirect {
            target,
            path,
            write,
            open_error,
            dup_error,
        })
    }

    fn input(path: &str) -> Result<Self, ParseError> {
        Self::new(
            STDIN_FILENO,
            path,
            false,
            format!("{APP_NAME}: cannot open {path} for input\n"),
            format!("{APP_NAME}: Could not redirect stdin for input file\n"),
        )
    }

    fn output(path: &str) -> Result<Self, ParseError> {
        Self::new(
            STDOUT_FILENO,
            path,
            true,
            format!("{APP_NAME}: cannot open {path} for output\n"),
            format!("{APP_NAME}: Could not redirect stdout for output file\n"),
        )
    }

    fn null_stdin() -> Result<Self, ParseError> {
        Self::new(
            STDIN_FILENO,
            NULL_DEVICE,
            false,
            format!("{APP_NAME}: Could not open \"{NULL_DEVICE}\"\n"),
            format!("{APP_NAME}: Could not redirect stdin to \"{NULL_DEVICE}\"\n"),
        )
    }

    fn apply(&self) -> Result<(), &str> {
        let (flags, mode) = if self.write {
            (
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
                Mode::from_bits_truncate(0o644),
            )
        } else {
            (OFlag::O_RDONLY, Mode::empty())
        };
        let fd = open(self.path.as_c_str(), flags, mode)
            .map_err(|_| self.open_error.as_str())?;
        // Owned from here so every return path closes it.
        let file = unsafe { OwnedFd::from_raw_fd(fd) };
        if file.as_raw_fd() == self.target {
            // Already in place; closing would undo the redirect.
            let _ = file.into_raw_fd();
            return Ok(());
        }
        dup2(file.as_raw_fd(), self.target).map_err(|_| self.dup_error.as_str())?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupStep {
    DefaultSigint,
    Redirect(FdRedirect),
}

/// What a child does between fork and exec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSetup {
    steps: Vec<SetupStep>,
}

impl ChildSetup {
    /// SIGINT goes back to its default first, then redirections in token
    /// order, then `/dev/null` on stdin for a background job that did not
    /// ask for input from a file.
    pub fn plan(intent: &ExecutionIntent) -> Result<Self, ParseError> {
        let mut steps = vec![SetupStep::DefaultSigint];
        for redirect in intent.redirects() {
            let fd_redirect = match redirect {
                Redirect::Input(path) => FdRedirect::input(path)?,
                Redirect::Output(path) => FdRedirect::output(path)?,
            };
            steps.push(SetupStep::Redirect(fd_redirect));
        }
        if intent.background && intent.input_redirect().is_none() {
            steps.push(SetupStep::Redirect(FdRedirect::null_stdin()?));
        }
        Ok(ChildSetup { steps })
    }

    pub fn steps(&self) -> &[SetupStep] {
        &self.steps
    }

    /// Runs in the child only. Stops at the first failure and hands back
    /// the message to print before exiting.
    pub(crate) fn apply(&self) -> Result<(), &str> {
        for step in &self.steps {
            match step {
                SetupStep::DefaultSigint => {
                    restore_default_sigint().map_err(|_| SIGINT_RESET_FAILED)?
                }
                SetupStep::Redirect(redirect) => redirect.apply()?,
            }
        }
        Ok(())
    }
}
