//! Check command implementation

use std::path::Path;

use colored::Colorize;

use deploy_core::CheckStatus;

use crate::error::{CliError, Result};

use super::load;

/// Run the check command
///
/// Reports where deployed files have diverged from the manifest. Exits with
/// an error when targets have not converged so CI jobs can gate on it.
pub fn run_check(manifest_path: &Path, repo_root: &Path, json: bool) -> Result<()> {
    let (manifest, engine) = load(manifest_path, repo_root)?;
    let report = engine.check(&manifest)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    match report.status {
        CheckStatus::Converged => Ok(()),
        CheckStatus::Missing => Err(CliError::user("some deployed files are missing")),
        CheckStatus::Drifted => Err(CliError::user("some deployed files have drifted")),
        CheckStatus::Broken => Err(CliError::user("a source locator could not be resolved")),
    }
}

fn print_report(report: &deploy_core::CheckReport) {
    match report.status {
        CheckStatus::Converged => {
            println!(
                "{} All targets match the manifest. No drift detected.",
                "OK".green().bold()
            );
        }
        CheckStatus::Missing => {
            println!("{} Some files are missing:", "MISSING".yellow().bold());
        }
        CheckStatus::Drifted => {
            println!("{} Deployed files have drifted:", "DRIFTED".red().bold());
        }
        CheckStatus::Broken => {
            println!("{} Source resolution failed:", "BROKEN".red().bold());
        }
    }

    for item in &report.missing {
        println!(
            "   {} {} ({}): {}",
            "-".yellow(),
            item.file.cyan(),
            item.rule_id.dimmed(),
            item.description
        );
    }
    for item in &report.drifted {
        println!(
            "   {} {} ({}): {}",
            "!".red(),
            item.file.cyan(),
            item.rule_id.dimmed(),
            item.description
        );
    }
    for message in &report.messages {
        println!("   {} {}", "x".red(), message);
    }

    if report.status != CheckStatus::Converged {
        println!();
        println!("Run {} to repair.", "deploy apply".cyan());
    }
}
