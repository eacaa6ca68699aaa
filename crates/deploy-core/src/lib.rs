//! Core layer for the deployment manager
//!
//! This crate turns a declarative TOML manifest of deployment rules into
//! converged filesystem state:
//!
//! - **Manifest**: named deployment rules parsed from TOML
//! - **File repository**: resolution of `scheme://repository/path` locators
//!   to enumerable file entries
//! - **DeployEngine**: apply and check operations with dry-run support
//!
//! # Architecture
//!
//! `deploy-core` sits between the filesystem layer and the CLI:
//!
//! ```text
//!        deploy-cli
//!            |
//!       deploy-core
//!            |
//!        deploy-fs
//! ```
//!
//! Applying a rule is a single synchronous convergence pass: resolve the
//! source locator, filter entries by the include pattern, copy matching
//! entries into the target directory, and set the declared mode bits.
//! Re-applying against an unchanged source produces no filesystem delta.

pub mod engine;
pub mod error;
pub mod locator;
pub mod manifest;
pub mod pattern;
pub mod repository;
pub mod rule;

pub use engine::{
    ApplyOptions, ApplyReport, CheckReport, CheckStatus, DeployEngine, DriftItem,
};
pub use error::{Error, Result};
pub use locator::SourceLocator;
pub use manifest::Manifest;
pub use pattern::IncludePattern;
pub use repository::{FileEntry, FileRepository, LocalRepository};
pub use rule::DeploymentRule;
