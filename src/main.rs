//! `prompthub` entry point.
//!
//! Parses the command line, loads configuration, initializes logging and
//! runs the selected command. Errors are printed on stderr with exit code 1.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use prompt_hub_mcp::cli::{self, Cli};
use prompt_hub_mcp::core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&cli.log_level(&config));

    cli::run(cli, config).await?;

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries command output and the STDIO transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
