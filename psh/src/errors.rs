use psh_types::{APP_NAME, Context};
use tracing::debug;

/// Display error in a user-friendly format without stack traces.
pub fn display_user_error(ctx: &Context, err: &anyhow::Error) {
    debug!("user error: {:?}", err);
    if ctx.write_stderr(&format!("{APP_NAME}: {err}")).is_err() {
        eprintln!("{APP_NAME}: {err}");
    }
}
