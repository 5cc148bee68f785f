//! Melange CLI
//!
//! Command-line front end for the Melange IPAM service:
//! - `melange` lists the available resources
//! - `melange <resource>` lists that resource's operations
//! - `melange <resource> <operation> key=value...` invokes an operation

mod cli;
mod config;
mod dispatch;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::exit_code;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match dispatch::run(cli).await {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
