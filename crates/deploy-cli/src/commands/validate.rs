//! Validate command implementation

use std::path::Path;

use colored::Colorize;

use deploy_core::Manifest;

use crate::error::Result;

/// Run the validate command
///
/// Parses the manifest and reports the declared rules. Does not touch the
/// filesystem beyond reading the manifest.
pub fn run_validate(manifest_path: &Path) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;

    println!(
        "{} {} is valid: {} rule(s)",
        "OK".green().bold(),
        manifest_path.display(),
        manifest.len()
    );
    for rule in manifest.rules() {
        println!(
            "   {} {} -> {} (mode {}, include {})",
            "-".dimmed(),
            rule.source,
            rule.target.cyan(),
            rule.mode,
            rule.include
        );
    }
    Ok(())
}
