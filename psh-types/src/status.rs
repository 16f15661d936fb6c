use crate::ExitStatus;

/// Outcome of the most recent foreground command, as seen by `status`.
///
/// A signaled command keeps both views: `last_exit_code` holds the
/// surrogate value 1 for callers that only test success, while
/// `last_signaled` and `last_terminating_signal` keep the real cause.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShellStatus {
    pub last_exit_code: i32,
    pub last_signaled: bool,
    pub last_terminating_signal: Option<i32>,
}

impl ShellStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a command result into the state. Returns false when the
    /// result carries nothing to record (background launch, no-op, exit).
    pub fn record(&mut self, status: ExitStatus) -> bool {
        match status {
            ExitStatus::ExitedWith(code) => {
                self.last_exit_code = code;
                self.last_signaled = false;
                self.last_terminating_signal = None;
                true
            }
            ExitStatus::Signaled(signal) => {
                self.last_exit_code = 1;
                self.last_signaled = true;
                self.last_terminating_signal = Some(signal as i32);
                true
            }
            ExitStatus::Running(_) | ExitStatus::Unchanged | ExitStatus::Exit => false,
        }
    }

    /// Text printed by the `status` builtin.
    pub fn report(&self) -> String {
        match (self.last_signaled, self.last_terminating_signal) {
            (true, Some(signal)) => format!("Terminated by signal {signal}"),
            _ => format!("Exit value: {}", self.last_exit_code),
        }
    }

    /// Process exit code for non-interactive runs, following the
    /// usual 128 + signal convention.
    pub fn exit_code(&self) -> i32 {
        match (self.last_signaled, self.last_terminating_signal) {
            (true, Some(signal)) => 128 + signal,
            _ => self.last_exit_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::Signal;
    use nix::unistd::Pid;

    #[test]
    fn starts_as_clean_exit() {
        let status = ShellStatus::new();
        assert_eq!(status.last_exit_code, 0);
        assert!(!status.last_signaled);
        assert_eq!(status.report(), "Exit value: 0");
    }

    #[test]
    fn signal_keeps_surrogate_and_cause() {
        let mut status = ShellStatus::new();
        assert!(status.record(ExitStatus::Signaled(Signal::SIGTERM)));
        assert_eq!(status.last_exit_code, 1);
        assert!(status.last_signaled);
        assert_eq!(status.last_terminating_signal, Some(15));
        assert_eq!(status.report(), "Terminated by signal 15");
        assert_eq!(status.exit_code(), 143);

        assert!(status.record(ExitStatus::ExitedWith(3)));
        assert!(!status.last_signaled);
        assert_eq!(status.last_terminating_signal, None);
        assert_eq!(status.report(), "Exit value: 3");
    }

    #[test]
    fn background_and_noop_results_are_not_folded() {
        let mut status = ShellStatus::new();
        status.record(ExitStatus::ExitedWith(2));
        let before = status;

        assert!(!status.record(ExitStatus::Running(Pid::from_raw(4242))));
        assert!(!status.record(ExitStatus::Unchanged));
        assert!(!status.record(ExitStatus::Exit));
        assert_eq!(status, before);
    }
}
