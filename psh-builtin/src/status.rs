use super::ShellProxy;
use psh_types::{Context, ExitStatus};

/// `status` prints how the last foreground command ended.
pub fn command(ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    ctx.write_stdout(&proxy.last_status().report()).ok();
    ExitStatus::Unchanged
}
