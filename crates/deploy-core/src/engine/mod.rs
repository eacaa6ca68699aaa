//! Deployment engine
//!
//! One convergence pass per invocation: apply deploys what the manifest
//! declares, check reports how the filesystem has diverged from it.

mod apply;
mod report;

pub use apply::{ApplyOptions, DeployEngine};
pub use report::{ApplyReport, CheckReport, CheckStatus, DriftItem};
