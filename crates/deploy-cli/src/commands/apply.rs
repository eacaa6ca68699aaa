//! Apply command implementation

use std::path::Path;

use colored::Colorize;

use deploy_core::ApplyOptions;

use crate::error::{CliError, Result};

use super::load;

/// Run the apply command
///
/// Applies every rule in the manifest, printing the actions taken. Rules
/// fail independently; the command errors if any rule failed.
pub fn run_apply(manifest_path: &Path, repo_root: &Path, dry_run: bool, json: bool) -> Result<()> {
    let (manifest, engine) = load(manifest_path, repo_root)?;
    let options = ApplyOptions { dry_run };
    let report = engine.apply(&manifest, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for action in &report.actions {
            println!("   {} {}", "-".dimmed(), action);
        }
        for error in &report.errors {
            println!("   {} {}", "!".red(), error);
        }

        if report.success {
            if report.is_no_op() {
                println!("{} Nothing to do; targets already converged.", "OK".green().bold());
            } else {
                println!("{} Deployment applied.", "OK".green().bold());
            }
        }
    }

    if report.success {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} rule(s) failed to apply",
            report.errors.len()
        )))
    }
}
