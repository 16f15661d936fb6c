use anyhow::Result;
use nix::errno::Errno;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, kill, sigaction};
use nix::unistd::Pid;
use tracing::{debug, error};

fn set_sigint(handler: SigHandler) -> nix::Result<()> {
    let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
    unsafe { sigaction(Signal::SIGINT, &action) }.map(|_| ())
}

/// Makes Ctrl-C at the prompt do nothing to the shell itself.
pub(crate) fn ignore_sigint() -> Result<()> {
    debug!("🔧 SIGNAL: Ignoring SIGINT in shell process");
    set_sigint(SigHandler::SigIgn)
        .map_err(|e| anyhow::anyhow!("failed to ignore SIGINT: {}", e))
}

/// Undoes `ignore_sigint` in a freshly forked child. Ignored dispositions
/// survive `exec`, so without this a child could never be interrupted.
/// Async-signal-safe: no allocation, no logging.
pub(crate) fn restore_default_sigint() -> nix::Result<()> {
    set_sigint(SigHandler::SigDfl)
}

/// Sends `signal` to `pid`. A process that is already gone counts as success.
pub(crate) fn send_signal(pid: Pid, signal: Signal) -> Result<()> {
    debug!("📡 SIGNAL: Sending signal {:?} to pid {}", signal, pid);
    match kill(pid, signal) {
        Ok(_) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => {
            error!(
                "📡 SIGNAL: Failed to send signal {:?} to pid {}: {}",
                signal, pid, e
            );
            Err(e.into())
        }
    }
}
