//! Deployment rules
//!
//! A rule is the manifest's atomic unit: converge one target directory
//! toward one source location, restricted to entries matching the include
//! pattern, with a fixed mode on every deployed file. Rules are declarative
//! and carry no state between runs.

use deploy_fs::{FileMode, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::{Error, IncludePattern, Result, SourceLocator};

/// A named deployment rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRule {
    /// Identifier, unique within the manifest. Filled in from the manifest
    /// table key when parsing.
    #[serde(skip, default)]
    pub id: String,
    /// Absolute directory the files are deployed into
    pub target: String,
    /// Reference into the file repository
    pub source: SourceLocator,
    /// Permission bits applied to every deployed file
    pub mode: FileMode,
    /// Basename glob restricting which source entries are deployed
    pub include: IncludePattern,
}

impl DeploymentRule {
    /// The target as a normalized path.
    pub fn target_path(&self) -> NormalizedPath {
        NormalizedPath::new(&self.target)
    }

    /// Validate the rule's declarative attributes.
    ///
    /// Checks only what can be known without touching the filesystem: the
    /// target must be an absolute path. Locator, mode, and pattern are
    /// already validated during deserialization.
    pub fn validate(&self) -> Result<()> {
        if !self.target_path().is_absolute() {
            return Err(Error::RuleValidation {
                rule: self.id.clone(),
                message: format!("target {:?} is not an absolute path", self.target),
            });
        }
        Ok(())
    }
}
