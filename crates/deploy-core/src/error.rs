//! Error types for deploy-core

use std::path::PathBuf;

/// Result type for deploy-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in deploy-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest file not found at expected path
    #[error("Manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// A rule failed validation when the manifest was loaded
    #[error("Invalid rule {rule}: {message}")]
    RuleValidation { rule: String, message: String },

    /// Source locator string could not be parsed
    #[error("Invalid source locator {value:?}: {reason}")]
    InvalidLocator { value: String, reason: String },

    /// Include pattern is not a valid glob
    #[error("Invalid include pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Source locator could not be resolved to file entries
    #[error("Failed to retrieve {locator}: {message}")]
    Retrieval { locator: String, message: String },

    /// Target directory cannot be written
    #[error("Target not writable: {path}")]
    TargetUnwritable { path: PathBuf },

    /// Target path exists but is not a directory
    #[error("Target exists and is not a directory: {path}")]
    TargetNotDirectory { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from deploy-fs
    #[error(transparent)]
    Fs(#[from] deploy_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
