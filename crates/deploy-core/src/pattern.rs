//! Include patterns
//!
//! A rule's include pattern is a shell-style glob matched against file
//! basenames only. Subdirectory structure never participates in matching;
//! `*.py` selects Python files at any depth under the source.

use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// A compiled basename glob.
#[derive(Debug, Clone)]
pub struct IncludePattern {
    raw: String,
    matcher: GlobMatcher,
}

impl IncludePattern {
    /// Compile a glob pattern such as `*.py`.
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    /// The original pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether a file basename matches the pattern.
    pub fn matches(&self, basename: &str) -> bool {
        self.matcher.is_match(basename)
    }
}

impl PartialEq for IncludePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for IncludePattern {}

impl std::fmt::Display for IncludePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for IncludePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for IncludePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}
