//! Command implementations

mod apply;
mod check;
mod validate;

pub use apply::run_apply;
pub use check::run_check;
pub use validate::run_validate;

use std::path::Path;

use deploy_core::{DeployEngine, LocalRepository, Manifest};

use crate::error::Result;

/// Load the manifest and build an engine over the local file repository.
fn load(manifest_path: &Path, repo_root: &Path) -> Result<(Manifest, DeployEngine<LocalRepository>)> {
    let manifest = Manifest::load(manifest_path)?;
    let engine = DeployEngine::new(LocalRepository::new(repo_root.to_path_buf()));
    Ok((manifest, engine))
}
