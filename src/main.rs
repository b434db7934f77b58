//! GemHub operator CLI.
//!
//! Loads configuration, initialises logging, and runs catalog maintenance
//! commands against the configured database and asset store.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod output;

use commands::Cli;
use gemhub_core::config::LoggingConfig;
use gemhub_core::types::Outcome;
use output::OutputFormat;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(c) => c,
        Err(e) => {
            output::print_error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = cli.execute(&config).await {
        tracing::error!(kind = %e.kind, "Command failed: {}", e.message);
        match cli.format {
            OutputFormat::Json => output::print_json(&Outcome::<()>::failed(&e)),
            OutputFormat::Table => output::print_error(&e.message),
        }
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
