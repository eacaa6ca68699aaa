//! File repository resolution
//!
//! A file repository is the store of distributable content that source
//! locators reference. The engine only needs to turn a locator into an
//! enumerable set of file entries; how the store is laid out is behind the
//! [`FileRepository`] trait. [`LocalRepository`] is the directory-backed
//! implementation: `scheme://<repository>/<path>` maps to
//! `<root>/<repository>/<path>`.

use std::fs;
use std::path::Path;

use deploy_fs::NormalizedPath;
use tracing::debug;

use crate::{Error, Result, SourceLocator};

/// A single distributable file within a resolved source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the resolved source directory, forward slashes.
    /// Subdirectory structure is preserved under the deployment target.
    pub relative_path: String,
    /// Absolute on-disk location of the source content
    pub source_path: NormalizedPath,
}

impl FileEntry {
    /// The entry's basename, which include patterns match against.
    pub fn basename(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }
}

/// Resolution of source locators to file entries.
pub trait FileRepository {
    /// The locator scheme this repository serves.
    fn scheme(&self) -> &str;

    /// Resolve a locator to the files beneath it, recursively.
    ///
    /// # Errors
    ///
    /// Returns `Error::Retrieval` when the locator does not name a reachable
    /// directory in this repository.
    fn resolve(&self, locator: &SourceLocator) -> Result<Vec<FileEntry>>;
}

/// Directory-backed file repository.
pub struct LocalRepository {
    scheme: String,
    root: NormalizedPath,
}

impl LocalRepository {
    /// Default locator scheme served by local repositories.
    pub const DEFAULT_SCHEME: &'static str = "repo";

    /// Create a repository rooted at a directory, serving the default scheme.
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self::with_scheme(Self::DEFAULT_SCHEME, root)
    }

    /// Create a repository serving a custom scheme.
    pub fn with_scheme(scheme: &str, root: impl Into<NormalizedPath>) -> Self {
        Self {
            scheme: scheme.to_string(),
            root: root.into(),
        }
    }

    fn retrieval_error(&self, locator: &SourceLocator, message: impl Into<String>) -> Error {
        Error::Retrieval {
            locator: locator.to_string(),
            message: message.into(),
        }
    }

    /// Walk a directory tree, collecting file entries with their paths
    /// relative to `base`.
    fn collect_entries(
        &self,
        base: &Path,
        dir: &Path,
        entries: &mut Vec<FileEntry>,
    ) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                self.collect_entries(base, &path, entries)?;
            } else {
                let relative = path
                    .strip_prefix(base)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                entries.push(FileEntry {
                    relative_path: relative,
                    source_path: NormalizedPath::new(&path),
                });
            }
        }
        Ok(())
    }
}

impl FileRepository for LocalRepository {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn resolve(&self, locator: &SourceLocator) -> Result<Vec<FileEntry>> {
        if locator.scheme() != self.scheme {
            return Err(self.retrieval_error(
                locator,
                format!(
                    "unsupported scheme {:?}, this repository serves {:?}",
                    locator.scheme(),
                    self.scheme
                ),
            ));
        }

        let mut source_dir = self.root.join(locator.repository());
        if !locator.path().is_empty() {
            source_dir = source_dir.join(locator.path());
        }

        let native = source_dir.to_native();
        if !native.exists() {
            return Err(self.retrieval_error(locator, "source location does not exist"));
        }
        if !native.is_dir() {
            return Err(self.retrieval_error(locator, "source location is not a directory"));
        }

        let mut entries = Vec::new();
        self.collect_entries(&native, &native, &mut entries)
            .map_err(|e| self.retrieval_error(locator, e.to_string()))?;

        // Stable order keeps reports and logs deterministic.
        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        debug!(locator = %locator, count = entries.len(), "resolved source locator");
        Ok(entries)
    }
}
