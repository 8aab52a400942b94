//! redirect-uploads command-line entry point.
//!
//! Runs the same hooks and admin actions as the MCP server, for shell
//! pipelines and cron jobs. Logs go to stderr; stdout carries results.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.run().await {
        eprintln!("redirect-uploads error: {err:#}");
        std::process::exit(1);
    }
}
