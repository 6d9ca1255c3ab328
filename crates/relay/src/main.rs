//! Relay CLI - OAuth 1.0a signing proxy.
//!
//! Provides commands for:
//! - `serve`: Start the signing proxy server
//! - `generate-tokens`: Walk the three-legged flow interactively

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GenerateTokensArgs, ServeArgs};
use output::Output;

/// Relay - OAuth 1.0a signing proxy.
#[derive(Parser)]
#[command(name = "relay", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the signing proxy server.
    Serve(ServeArgs),
    /// Generate OAuth access tokens interactively.
    GenerateTokens(GenerateTokensArgs),
}

/// Select the log filter: `--verbose` forces INFO, otherwise `RUST_LOG`
/// (or the subscriber default) decides.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Only serve carries a verbose flag
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .init();

    let result = match cli.command {
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute())
        }
        Commands::GenerateTokens(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
