use anyhow::Result;
use libc::{STDERR_FILENO, STDOUT_FILENO};
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::fs::File;
use std::io::Write;
use std::mem::ManuallyDrop;
use std::os::unix::io::{FromRawFd, RawFd};
use thiserror::Error;

pub mod status;
pub use status::ShellStatus;

/// Prefix for every message the shell prints on its own behalf.
pub const APP_NAME: &str = "psh";

/// Errors found while turning a token list into something runnable.
/// None of these reach a child process; the command simply does not run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing file name after \"{0}\"")]
    MalformedRedirection(String),

    #[error("\"{0}\" may appear only once per command")]
    DuplicateRedirection(String),

    #[error("missing command")]
    MissingCommand,

    #[error("too many arguments (limit is {0})")]
    TooManyArguments(usize),

    #[error("argument contains a nul byte: {0:?}")]
    NulByte(String),
}

/// Pebble shell specific error types
#[derive(Error, Debug)]
pub enum PshError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("System call failed: {0}")]
    System(#[from] nix::errno::Errno),
}

pub type PshResult<T> = std::result::Result<T, PshError>;

/// Normalized result of running one command, builtin or external.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitStatus {
    /// Finished normally with this exit code.
    ExitedWith(i32),
    /// Killed by this signal.
    Signaled(Signal),
    /// Launched in the background and still running.
    Running(Pid),
    /// Nothing happened that should touch the last-status state.
    Unchanged,
    /// The shell should stop its read-eval loop.
    Exit,
}

/// Where a command writes the shell's own messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub outfile: RawFd,
    pub errfile: RawFd,
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            outfile: STDOUT_FILENO,
            errfile: STDERR_FILENO,
        }
    }

    pub fn write_stdout(&self, msg: &str) -> Result<()> {
        write_fd(self.outfile, msg)
    }

    pub fn write_stderr(&self, msg: &str) -> Result<()> {
        write_fd(self.errfile, msg)
    }

    /// Writes `msg` without a trailing newline and flushes, for prompts.
    pub fn write_prompt(&self, msg: &str) -> Result<()> {
        // The descriptor is borrowed, never closed here.
        let mut file = ManuallyDrop::new(unsafe { File::from_raw_fd(self.outfile) });
        file.write_all(msg.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

fn write_fd(fd: RawFd, msg: &str) -> Result<()> {
    let mut file = ManuallyDrop::new(unsafe { File::from_raw_fd(fd) });
    writeln!(&mut *file, "{msg}")?;
    Ok(())
}
