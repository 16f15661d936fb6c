use libc::STDERR_FILENO;
use nix::unistd::{ForkResult, Pid, execvp, fork, write};
use psh_types::{ParseError, PshResult};
use std::ffi::CString;
use tracing::debug;

use super::setup::ChildSetup;
use crate::parser::ExecutionIntent;

const EXEC_FAILED: &[u8] = b"psh: no such file or directory\n";

/// Program and argv converted to C strings before fork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PreparedCommand {
    program: CString,
    argv: Vec<CString>,
}

impl PreparedCommand {
    pub(crate) fn new(intent: &ExecutionIntent) -> Result<Self, ParseError> {
        let to_c = |s: String| CString::new(s.clone()).map_err(|_| ParseError::NulByte(s));
        let argv = intent
            .argv()
            .into_iter()
            .map(to_c)
            .collect::<Result<Vec<_>, _>>()?;
        let program = argv.first().cloned().ok_or(ParseError::MissingCommand)?;
        Ok(PreparedCommand { program, argv })
    }
}

pub(crate) fn fork_process(command: &PreparedCommand, setup: &ChildSetup) -> PshResult<Pid> {
    debug!("🍴 FORK: About to fork external process {:?}", command.program);
    let pid = unsafe { fork()? };

    match pid {
        ForkResult::Parent { child } => {
            debug!("🍴 FORK: Parent process - child pid: {}", child);
            Ok(child)
        }
        ForkResult::Child => exec_child(command, setup),
    }
}

/// Child side of the fork. Only raw system calls from here on: the parent
/// may have other threads, so allocating or logging could deadlock.
fn exec_child(command: &PreparedCommand, setup: &ChildSetup) -> ! {
    if let Err(msg) = setup.apply() {
        let _ = write(STDERR_FILENO, msg.as_bytes());
        unsafe { libc::_exit(1) };
    }
    let _ = execvp(&command.program, &command.argv);
    let _ = write(STDERR_FILENO, EXEC_FAILED);
    unsafe { libc::_exit(1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepares_program_and_argv() {
        let intent = ExecutionIntent::from_tokens(&[
            "echo".to_string(),
            "hi".to_string(),
            ">".to_string(),
            "out".to_string(),
        ])
        .unwrap();
        let command = PreparedCommand::new(&intent).unwrap();
        assert_eq!(command.program.as_bytes(), b"echo");
        assert_eq!(command.argv.len(), 2);
        assert_eq!(command.argv[1].as_bytes(), b"hi");
    }

    #[test]
    fn rejects_nul_bytes() {
        let intent =
            ExecutionIntent::from_tokens(&["echo".to_string(), "a\0".to_string()]).unwrap();
        assert_eq!(
            PreparedCommand::new(&intent),
            Err(ParseError::NulByte("a\0".to_string()))
        );
    }
}
