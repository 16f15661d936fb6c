use super::ShellProxy;
use psh_types::{APP_NAME, Context, ExitStatus};
use tracing::{debug, warn};

/// `cd [dir]`. Without an argument the shell moves to `$HOME`, and does
/// nothing when `HOME` is unset. A failed change is this builtin's own
/// status (exit code 1); success leaves the last status untouched.
pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    match argv.get(1).map(|s| s.as_str()) {
        None => {
            if let Some(home) = proxy.get_var("HOME") {
                if let Err(err) = proxy.changepwd(&home) {
                    warn!("cd: failed to change to HOME {}: {}", home, err);
                }
            } else {
                debug!("cd: HOME is unset, nothing to do");
            }
            ExitStatus::Unchanged
        }
        Some(dir) => match proxy.changepwd(dir) {
            Ok(_) => ExitStatus::Unchanged,
            Err(err) => {
                debug!("cd: {}: {}", dir, err);
                ctx.write_stderr(&format!(
                    "{APP_NAME}: Could not find the directory \"{dir}\""
                ))
                .ok();
                ExitStatus::ExitedWith(1)
            }
        },
    }
}
