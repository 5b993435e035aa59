use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod artifact;
mod cli;
mod matrix;
mod output;
mod presets;
mod setup_action;
mod steps;
mod util;
mod validate;

use cli::{Command, RootArgs};

/// Environment variable holding the log filter (`tracing_subscriber` syntax).
const LOG_ENV: &str = "PRESET_CI_LOG";

fn main() {
    let args = RootArgs::parse();
    init_logging(args.verbose);

    if let Err(err) = run(args.command) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Matrix(args) => matrix::run_matrix(&args),
        Command::Steps(args) => steps::run_steps(&args),
        Command::Validate(args) => validate::run_validate(&args),
        Command::SetupAction(args) => setup_action::run_setup_action(&args),
    }
}

/// Logs go to stderr; stdout carries only step outputs.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
