use anyhow::Result;
use once_cell::sync::Lazy;
use psh_types::{Context, ExitStatus, ShellStatus};
use std::collections::HashMap;
use tracing::debug;

// Builtin command modules
pub mod cd;
mod status;

/// Trait that provides an interface for builtin commands to interact with the shell
/// This allows builtin commands to perform shell operations without direct coupling
pub trait ShellProxy {
    /// Asks the read-eval loop to stop after the current command
    fn exit_shell(&mut self);

    /// Changes the current working directory of the shell process
    fn changepwd(&mut self, path: &str) -> Result<()>;

    /// Retrieves an environment variable visible to the shell
    fn get_var(&mut self, key: &str) -> Option<String>;

    /// Outcome of the last foreground command
    fn last_status(&self) -> ShellStatus;
}

/// Type alias for builtin command function signature
/// All builtin commands must conform to this signature
pub type BuiltinCommand =
    fn(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus;

/// Registry of all builtin commands, keyed by the name typed at the prompt
pub static BUILTIN_COMMAND: Lazy<HashMap<&'static str, BuiltinCommand>> = Lazy::new(|| {
    let mut builtin = HashMap::new();
    builtin.insert("exit", exit as BuiltinCommand);
    builtin.insert("cd", cd::command as BuiltinCommand);
    builtin.insert("status", status::command as BuiltinCommand);
    builtin
});

/// Retrieves a builtin command function by name
/// Returns None if the command is not found
pub fn get_command(name: &str) -> Option<BuiltinCommand> {
    BUILTIN_COMMAND.get(name).copied()
}

/// Built-in exit command implementation
/// Initiates graceful shell termination
pub fn exit(_ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    debug!("Exit command called - initiating normal shell exit");
    proxy.exit_shell();
    ExitStatus::Exit
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::io::{Read, Seek};
    use std::os::unix::io::AsRawFd;

    #[derive(Debug, Default)]
    pub struct MockProxy {
        pub exited: bool,
        pub cwd: Option<String>,
        pub missing: Vec<String>,
        pub home: Option<String>,
        pub status: ShellStatus,
    }

    impl ShellProxy for MockProxy {
        fn exit_shell(&mut self) {
            self.exited = true;
        }

        fn changepwd(&mut self, path: &str) -> Result<()> {
            if self.missing.iter().any(|m| m == path) {
                anyhow::bail!("No such file or directory");
            }
            self.cwd = Some(path.to_string());
            Ok(())
        }

        fn get_var(&mut self, key: &str) -> Option<String> {
            match key {
                "HOME" => self.home.clone(),
                _ => None,
            }
        }

        fn last_status(&self) -> ShellStatus {
            self.status
        }
    }

    /// Context whose output lands in temp files the test can read back.
    pub struct Captured {
        out: std::fs::File,
        err: std::fs::File,
    }

    impl Captured {
        pub fn new() -> Self {
            Captured {
                out: tempfile::tempfile().unwrap(),
                err: tempfile::tempfile().unwrap(),
            }
        }

        pub fn ctx(&self) -> Context {
            Context {
                outfile: self.out.as_raw_fd(),
                errfile: self.err.as_raw_fd(),
            }
        }

        pub fn stdout(&mut self) -> String {
            read_all(&mut self.out)
        }

        pub fn stderr(&mut self) -> String {
            read_all(&mut self.err)
        }
    }

    fn read_all(file: &mut std::fs::File) -> String {
        let mut buf = String::new();
        file.rewind().unwrap();
        file.read_to_string(&mut buf).unwrap();
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{Captured, MockProxy};
    use super::*;

    #[test]
    fn registry_knows_core_builtins() {
        assert!(get_command("cd").is_some());
        assert!(get_command("status").is_some());
        assert!(get_command("exit").is_some());
        assert!(get_command("ls").is_none());
        assert!(get_command("#").is_none());
    }

    #[test]
    fn exit_stops_the_shell() {
        let cap = Captured::new();
        let mut proxy = MockProxy::default();
        let status = exit(&cap.ctx(), vec!["exit".to_string()], &mut proxy);
        assert_eq!(status, ExitStatus::Exit);
        assert!(proxy.exited);
    }
}
