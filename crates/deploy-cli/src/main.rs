//! Deployment Manager CLI
//!
//! The command-line interface for applying declarative deployment manifests.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Validate) => commands::run_validate(&cli.manifest),
        Some(Commands::Check { json }) => commands::run_check(&cli.manifest, &cli.repo_root, json),
        Some(Commands::Apply { dry_run, json }) => {
            commands::run_apply(&cli.manifest, &cli.repo_root, dry_run, json)
        }
        None => {
            // No command provided - show help hint
            println!("{} Deployment Manager CLI", "deploy".green().bold());
            println!();
            println!("Run {} for available commands.", "deploy --help".cyan());
            Ok(())
        }
    }
}
