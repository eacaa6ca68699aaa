//! Octal file modes
//!
//! Deployment rules express permissions as a three-digit octal string
//! ("755"). The string form is what appears in manifests and reports; the
//! numeric bits are what get applied at the filesystem boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Permission bits for deployed files, parsed from a three-digit octal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    /// Parse a three-digit octal permission string such as "755" or "644".
    pub fn parse(value: &str) -> Result<Self> {
        if value.len() != 3 || !value.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(Error::InvalidMode {
                value: value.to_string(),
            });
        }
        // Digits are validated octal, so this cannot fail.
        let bits = u32::from_str_radix(value, 8).map_err(|_| Error::InvalidMode {
            value: value.to_string(),
        })?;
        Ok(Self(bits))
    }

    /// The numeric permission bits (e.g. 0o755).
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether on-disk permission bits match this mode.
    ///
    /// Only the lower nine bits are compared; higher bits carry file type
    /// and setuid/setgid/sticky information this tool never sets.
    pub fn matches(&self, disk_mode: u32) -> bool {
        disk_mode & 0o777 == self.0
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03o}", self.0)
    }
}

impl std::str::FromStr for FileMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for FileMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FileMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
