use anyhow::Result;
use clap::Parser;
use pebble_shell::repl::DEFAULT_PROMPT;
use pebble_shell::{Repl, Shell};
use psh_types::Context;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter, e.g. `PSH_LOG=debug`.
const LOG_ENV: &str = "PSH_LOG";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run one command line and exit with its status
    #[arg(short, long)]
    command: Option<String>,

    /// Prompt printed before each line is read
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Write log records to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.log_file.as_deref()) {
        eprintln!("Failed to initialize tracing: {err}");
        return ExitCode::FAILURE;
    }

    setup_panic_handler();

    let mut shell = Shell::new();
    shell.set_signals();
    let ctx = Context::new();

    if let Some(command) = cli.command.as_deref() {
        execute_command(&mut shell, &ctx, command)
    } else {
        run_interactive(&mut shell, &ctx, cli.prompt)
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true);

    let result = match log_file {
        Some(path) => {
            let file = std::sync::Arc::new(std::fs::File::create(path)?);
            builder.with_ansi(false).with_writer(file).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("{e}"))
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        };

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        tracing::error!("PANIC OCCURRED: {} at {}", payload, location);
        eprintln!("\n=== pebble-shell PANIC ===");
        eprintln!("Message: {}", payload);
        eprintln!("Location: {}", location);
        eprintln!("==========================\n");
    }));
}

fn exit_code(shell: &Shell) -> ExitCode {
    ExitCode::from(shell.status.exit_code().clamp(0, 255) as u8)
}

fn execute_command(shell: &mut Shell, ctx: &Context, command: &str) -> ExitCode {
    debug!("run command mode {:?}", command);
    shell.eval_str(ctx, command);
    shell.reap_background(ctx);
    shell.terminate_background_jobs();
    exit_code(shell)
}

fn run_interactive(shell: &mut Shell, ctx: &Context, prompt: String) -> ExitCode {
    debug!("start shell");
    let stdin = std::io::stdin();
    let mut repl = Repl::new(shell, prompt);
    match repl.run(ctx, stdin.lock()) {
        Ok(()) => exit_code(repl.shell),
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::FAILURE
        }
    }
}
