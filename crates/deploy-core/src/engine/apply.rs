//! DeployEngine implementation
//!
//! The engine turns manifest rules into filesystem state. Each apply pass
//! works rule by rule: resolve the source locator, filter the entries by the
//! include pattern, copy each matching entry into the target directory, and
//! set the declared mode. Resolution finishes before the first write, so an
//! unreachable source leaves the target untouched.

use deploy_fs::checksum::{compute_content_checksum, compute_file_checksum};
use deploy_fs::{NormalizedPath, io};
use tracing::{debug, info, warn};

use crate::repository::{FileEntry, FileRepository};
use crate::{DeploymentRule, Error, Manifest, Result};

use super::report::{ApplyReport, CheckReport, DriftItem};

/// Options for apply operations
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// If true, simulate changes without modifying the filesystem.
    /// Actions will be prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

/// Engine for applying and checking deployment rules
///
/// Two operations:
/// - **apply**: converge each rule's target toward its source
/// - **check**: report where targets have diverged without touching them
pub struct DeployEngine<R: FileRepository> {
    repository: R,
}

impl<R: FileRepository> DeployEngine<R> {
    /// Create an engine over a file repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// The repository this engine resolves locators against.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Apply every rule in the manifest.
    ///
    /// Rules are independent: a failing rule is recorded in the report's
    /// errors and the pass continues with the next rule. `success` is false
    /// if any rule failed.
    pub fn apply(&self, manifest: &Manifest, options: &ApplyOptions) -> Result<ApplyReport> {
        let mut report = ApplyReport::success();

        for rule in manifest.rules() {
            match self.apply_rule(rule, options) {
                Ok(actions) => {
                    for action in actions {
                        report = report.with_action(action);
                    }
                }
                Err(e) => {
                    warn!(rule = %rule.id, error = %e, "rule failed");
                    report.errors.push(format!("{}: {}", rule.id, e));
                }
            }
        }

        report.success = report.errors.is_empty();
        report.finished_at = chrono::Utc::now();
        Ok(report)
    }

    /// Apply a single rule.
    ///
    /// Returns the actions taken: `deployed <path>` for each file written,
    /// `unchanged <path>` for files already converged, and a note when the
    /// include pattern matched nothing.
    pub fn apply_rule(&self, rule: &DeploymentRule, options: &ApplyOptions) -> Result<Vec<String>> {
        let mut actions = Vec::new();

        // Resolve and filter before any write.
        let entries = self.matching_entries(rule)?;
        let target = rule.target_path();

        if entries.is_empty() {
            debug!(rule = %rule.id, "include pattern matched no entries");
            actions.push(format!("no entries matched {} for {}", rule.include, rule.id));
            return Ok(actions);
        }

        self.ensure_target_dir(&target, options, &mut actions)?;

        for entry in &entries {
            let dest = target.join(&entry.relative_path);

            if self.is_converged(&entry.source_path, &dest, rule)? {
                actions.push(format!("unchanged {}", dest));
                continue;
            }

            if options.dry_run {
                actions.push(format!("[dry-run] Would deploy {}", dest));
                continue;
            }

            io::copy_entry(&entry.source_path, &dest, rule.mode).map_err(|e| match e {
                // Only permission failures on the target side become
                // TargetUnwritable; an unreadable source file surfaces as
                // the filesystem error naming the source path.
                deploy_fs::Error::PermissionDenied { ref path }
                    if *path != entry.source_path.to_native() =>
                {
                    Error::TargetUnwritable {
                        path: dest.to_native(),
                    }
                }
                other => Error::Fs(other),
            })?;
            actions.push(format!("deployed {}", dest));
        }

        info!(rule = %rule.id, entries = entries.len(), "rule applied");
        Ok(actions)
    }

    /// Check every rule in the manifest without modifying anything.
    pub fn check(&self, manifest: &Manifest) -> Result<CheckReport> {
        let mut report = CheckReport::converged();

        for rule in manifest.rules() {
            report = report.merge(self.check_rule(rule)?);
        }

        Ok(report)
    }

    /// Check a single rule's convergence.
    pub fn check_rule(&self, rule: &DeploymentRule) -> Result<CheckReport> {
        let entries = match self.matching_entries(rule) {
            Ok(entries) => entries,
            Err(Error::Retrieval { locator, message }) => {
                return Ok(CheckReport::broken(format!(
                    "{}: failed to retrieve {}: {}",
                    rule.id, locator, message
                )));
            }
            Err(e) => return Err(e),
        };

        let target = rule.target_path();
        let mut missing = Vec::new();
        let mut drifted = Vec::new();

        for entry in &entries {
            let dest = target.join(&entry.relative_path);

            if !dest.is_file() {
                missing.push(DriftItem {
                    rule_id: rule.id.clone(),
                    file: dest.to_string(),
                    description: "file not found".to_string(),
                });
                continue;
            }

            let expected = compute_file_checksum(entry.source_path.as_ref())
                .map_err(|e| deploy_fs::Error::io(entry.source_path.to_native(), e))?;
            let actual = compute_file_checksum(dest.as_ref())
                .map_err(|e| deploy_fs::Error::io(dest.to_native(), e))?;

            if expected != actual {
                drifted.push(DriftItem {
                    rule_id: rule.id.clone(),
                    file: dest.to_string(),
                    description: format!(
                        "checksum mismatch: expected {}, got {}",
                        expected, actual
                    ),
                });
                continue;
            }

            if let Some(disk_mode) = io::read_mode(&dest)?
                && !rule.mode.matches(disk_mode)
            {
                drifted.push(DriftItem {
                    rule_id: rule.id.clone(),
                    file: dest.to_string(),
                    description: format!(
                        "mode mismatch: expected {}, got {:03o}",
                        rule.mode,
                        disk_mode & 0o777
                    ),
                });
            }
        }

        if !drifted.is_empty() {
            let mut report = CheckReport::with_drifted(drifted);
            report.missing = missing;
            Ok(report)
        } else if !missing.is_empty() {
            Ok(CheckReport::with_missing(missing))
        } else {
            Ok(CheckReport::converged())
        }
    }

    /// Resolve a rule's source and keep only entries whose basename matches
    /// the include pattern.
    fn matching_entries(&self, rule: &DeploymentRule) -> Result<Vec<FileEntry>> {
        let entries = self.repository.resolve(&rule.source)?;
        Ok(entries
            .into_iter()
            .filter(|entry| rule.include.matches(entry.basename()))
            .collect())
    }

    /// Create the target directory if absent, failing when the path exists
    /// as something other than a directory.
    fn ensure_target_dir(
        &self,
        target: &NormalizedPath,
        options: &ApplyOptions,
        actions: &mut Vec<String>,
    ) -> Result<()> {
        if target.exists() {
            if !target.is_dir() {
                return Err(Error::TargetNotDirectory {
                    path: target.to_native(),
                });
            }
            return Ok(());
        }

        if options.dry_run {
            actions.push(format!("[dry-run] Would create directory {}", target));
            return Ok(());
        }

        io::ensure_dir(target).map_err(|e| {
            if matches!(e, deploy_fs::Error::PermissionDenied { .. }) {
                Error::TargetUnwritable {
                    path: target.to_native(),
                }
            } else {
                Error::Fs(e)
            }
        })?;
        actions.push(format!("created directory {}", target));
        Ok(())
    }

    /// Whether a deployed file already matches its source entry in both
    /// content and mode.
    fn is_converged(
        &self,
        source: &NormalizedPath,
        dest: &NormalizedPath,
        rule: &DeploymentRule,
    ) -> Result<bool> {
        if !dest.is_file() {
            return Ok(false);
        }

        let source_content =
            std::fs::read(source.to_native()).map_err(|e| deploy_fs::Error::io(source.to_native(), e))?;
        let expected = compute_content_checksum(&source_content);
        let actual = compute_file_checksum(dest.as_ref())
            .map_err(|e| deploy_fs::Error::io(dest.to_native(), e))?;
        if expected != actual {
            return Ok(false);
        }

        match io::read_mode(dest)? {
            Some(disk_mode) => Ok(rule.mode.matches(disk_mode)),
            // Platform has no mode bits; content match is convergence.
            None => Ok(true),
        }
    }
}
