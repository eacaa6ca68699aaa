//! Source locators
//!
//! A locator is the manifest's reference into a file repository, written
//! `<scheme>://<repository>/<path>`. The scheme names the repository kind,
//! the repository segment names a store within it, and the path selects a
//! directory of distributable files.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// A parsed `<scheme>://<repository>/<path>` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocator {
    scheme: String,
    repository: String,
    path: String,
}

impl SourceLocator {
    /// Parse a locator string.
    ///
    /// The scheme and repository segments are required; the path may be
    /// empty, meaning the repository root.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidLocator {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let (scheme, rest) = value
            .split_once("://")
            .ok_or_else(|| invalid("missing '://' separator"))?;
        if scheme.is_empty() {
            return Err(invalid("empty scheme"));
        }
        if !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-')
        {
            return Err(invalid("scheme contains invalid characters"));
        }

        let (repository, path) = match rest.split_once('/') {
            Some((repo, path)) => (repo, path.trim_matches('/')),
            None => (rest, ""),
        };
        if repository.is_empty() {
            return Err(invalid("empty repository segment"));
        }

        Ok(Self {
            scheme: scheme.to_string(),
            repository: repository.to_string(),
            path: path.to_string(),
        })
    }

    /// The locator scheme (e.g. "repo").
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The repository name within the store.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// The path within the repository; empty means the repository root.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}://{}", self.scheme, self.repository)
        } else {
            write!(f, "{}://{}/{}", self.scheme, self.repository, self.path)
        }
    }
}

impl std::str::FromStr for SourceLocator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for SourceLocator {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SourceLocator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
