use nix::sys::signal::Signal;
use psh_types::ExitStatus;

/// How a child ended, as reported by `waitpid`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProcessState {
    Exited(i32),
    Signaled(Signal),
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProcessState::Exited(code) => write!(formatter, "Exited value: {code}"),
            ProcessState::Signaled(signal) => {
                write!(formatter, "terminated by signal {}", *signal as i32)
            }
        }
    }
}

impl From<ProcessState> for ExitStatus {
    fn from(state: ProcessState) -> Self {
        match state {
            ProcessState::Exited(code) => ExitStatus::ExitedWith(code),
            ProcessState::Signaled(signal) => ExitStatus::Signaled(signal),
        }
    }
}
