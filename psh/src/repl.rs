use anyhow::{Context as _, Result};
use psh_types::Context;
use std::io::BufRead;
use tracing::debug;

use crate::shell::Shell;

pub const DEFAULT_PROMPT: &str = ": ";

/// The read-eval loop around a `Shell`.
pub struct Repl<'a> {
    pub shell: &'a mut Shell,
    prompt: String,
}

impl<'a> Repl<'a> {
    pub fn new(shell: &'a mut Shell, prompt: impl Into<String>) -> Self {
        Repl {
            shell,
            prompt: prompt.into(),
        }
    }

    /// Reads lines from `input` until `exit` or end of input. Finished
    /// background jobs are reported before every prompt; jobs still
    /// running when the loop ends are killed.
    pub fn run<R: BufRead>(&mut self, ctx: &Context, mut input: R) -> Result<()> {
        let mut buf = Vec::new();
        let result = loop {
            self.shell.reap_background(ctx);
            if let Err(err) = ctx.write_prompt(&self.prompt) {
                break Err(err);
            }

            buf.clear();
            match input.read_until(b'\n', &mut buf).context("failed to read input") {
                Ok(0) => {
                    debug!("end of input");
                    break Ok(());
                }
                Ok(_) => {}
                Err(err) => break Err(err),
            }

            // Bytes that are not UTF-8 become U+FFFD instead of ending the session.
            let line = String::from_utf8_lossy(&buf);
            if !self.shell.eval_str(ctx, &line) {
                break Ok(());
            }
        };

        self.shell.terminate_background_jobs();
        result
    }
}
