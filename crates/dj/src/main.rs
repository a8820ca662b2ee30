//! dj CLI - djot document tree renderer.
//!
//! Provides commands for:
//! - `render`: Render djot JSON ASTs to HTML markup
//! - `sanitize`: Sanitize a raw HTML fragment

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, SanitizeArgs};
use output::Output;

/// dj - djot document tree renderer.
#[derive(Parser)]
#[command(name = "dj", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render djot JSON ASTs to HTML.
    Render(RenderArgs),
    /// Sanitize a raw HTML fragment.
    Sanitize(SanitizeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Sanitize(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
