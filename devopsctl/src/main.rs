use std::process::ExitCode;

use clap::Parser;
use devopsctl::{Cli, SystemRunner, execute};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Non-overriding: real environment wins over `.env`.
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(err) if err.not_found() => {}
        Err(err) => {
            eprintln!("failed to load .env: {err}");
            return ExitCode::FAILURE;
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match execute(&cli, &SystemRunner) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "container tool invocation failed");
            let code = u8::try_from(err.exit_code()).unwrap_or(1);
            ExitCode::from(code.max(1))
        }
    }
}
