//! Manifest parsing
//!
//! The manifest is a TOML document declaring deployment rules keyed by
//! identifier:
//!
//! ```toml
//! [rules.parseusn]
//! target  = "/usr/local/bin"
//! source  = "repo://parseusn/files"
//! mode    = "755"
//! include = "*.py"
//! ```
//!
//! Rule identifiers are unique by construction (TOML table keys). Rules are
//! iterated in sorted identifier order so apply and check runs are
//! deterministic.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{DeploymentRule, Error, Result};

/// A parsed deployment manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Deployment rules keyed by identifier
    #[serde(default)]
    rules: BTreeMap<String, DeploymentRule>,
}

impl Manifest {
    /// Parse a manifest from TOML content and validate every rule.
    pub fn parse(content: &str) -> Result<Self> {
        let mut manifest: Manifest = toml::from_str(content)?;
        for (id, rule) in &mut manifest.rules {
            rule.id = id.clone();
        }
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns `ManifestNotFound` if the file does not exist, or a parse or
    /// validation error otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Validate every rule's declarative attributes.
    pub fn validate(&self) -> Result<()> {
        for rule in self.rules.values() {
            rule.validate()?;
        }
        Ok(())
    }

    /// Iterate rules in sorted identifier order.
    pub fn rules(&self) -> impl Iterator<Item = &DeploymentRule> {
        self.rules.values()
    }

    /// Look up a rule by identifier.
    pub fn rule(&self, id: &str) -> Option<&DeploymentRule> {
        self.rules.get(id)
    }

    /// Number of rules in the manifest.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the manifest declares no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MANIFEST: &str = r#"
[rules.parseusn]
target  = "/usr/local/bin"
source  = "repo://parseusn/files"
mode    = "755"
include = "*.py"
"#;

    #[test]
    fn parses_single_rule() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.len(), 1);

        let rule = manifest.rule("parseusn").unwrap();
        assert_eq!(rule.id, "parseusn");
        assert_eq!(rule.target, "/usr/local/bin");
        assert_eq!(rule.source.to_string(), "repo://parseusn/files");
        assert_eq!(rule.mode.to_string(), "755");
        assert_eq!(rule.include.as_str(), "*.py");
    }

    #[test]
    fn empty_manifest_is_valid() {
        let manifest = Manifest::parse("").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn rules_iterate_in_sorted_order() {
        let manifest = Manifest::parse(
            r#"
[rules.zeta]
target  = "/opt/zeta"
source  = "repo://zeta/files"
mode    = "644"
include = "*"

[rules.alpha]
target  = "/opt/alpha"
source  = "repo://alpha/files"
mode    = "644"
include = "*"
"#,
        )
        .unwrap();

        let ids: Vec<&str> = manifest.rules().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn relative_target_fails_validation() {
        let result = Manifest::parse(
            r#"
[rules.bad]
target  = "relative/path"
source  = "repo://bad/files"
mode    = "644"
include = "*"
"#,
        );
        assert!(matches!(result, Err(Error::RuleValidation { .. })));
    }

    #[test]
    fn bad_mode_fails_parse() {
        let result = Manifest::parse(
            r#"
[rules.bad]
target  = "/opt/bad"
source  = "repo://bad/files"
mode    = "99x"
include = "*"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn bad_locator_fails_parse() {
        let result = Manifest::parse(
            r#"
[rules.bad]
target  = "/opt/bad"
source  = "not-a-locator"
mode    = "644"
include = "*"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_manifest_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = Manifest::load(&dir.path().join("manifest.toml"));
        assert!(matches!(result, Err(Error::ManifestNotFound { .. })));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.toml");
        std::fs::write(&path, MANIFEST).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.len(), 1);
    }
}
