//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Deployment Manager - Converge filesystem targets to a declarative manifest
#[derive(Parser, Debug)]
#[command(name = "deploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the deployment manifest
    #[arg(short, long, global = true, default_value = "manifest.toml")]
    pub manifest: PathBuf,

    /// Root directory of the local file repository
    #[arg(short, long, global = true, default_value = "files")]
    pub repo_root: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Parse and validate the manifest without touching the filesystem
    Validate,

    /// Check deployed files for drift against the manifest
    Check {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Apply every deployment rule in the manifest
    ///
    /// Each rule resolves its source locator, filters entries by the include
    /// pattern, and copies matching files into the target directory with the
    /// declared mode. Re-running against an unchanged source is a no-op.
    Apply {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
