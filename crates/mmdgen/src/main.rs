//! Mmdgen - Resilient Mermaid diagram generation with error recovery.
//!
//! Generates diagram images from Mermaid source, and on rendering failure
//! matches the error against a curated troubleshooting catalog to surface
//! a concrete fix or a search query.

mod commands;
mod display;
mod errors;

use clap::{Parser, Subcommand};
use mmdgen_common::config::Config;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "mmdgen")]
#[command(about = "Resilient Mermaid diagram generation with error recovery", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging (debug level, to stderr)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Path to mmdgen.toml (discovered if not given)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a diagram image with recovery guidance on failure
    Generate(commands::generate::GenerateArgs),

    /// List, extract, or rewrite Mermaid blocks in a markdown document
    Extract(commands::extract::ExtractArgs),

    /// Render every .mmd file under a directory
    Batch(commands::batch::BatchArgs),

    /// Check the environment: renderer, catalog, output directory
    Doctor(commands::doctor::DoctorArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays machine-readable.
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default(cli.config.as_deref());

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args, &config).await,
        Commands::Extract(args) => commands::extract::run(args),
        Commands::Batch(args) => commands::batch::run(args, &config).await,
        Commands::Doctor(args) => commands::doctor::run(args, &config).await,
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR: {:#}", err);
            errors::EXIT_GENERAL_ERROR
        }
    };
    std::process::exit(code);
}
