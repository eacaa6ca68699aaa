//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;

use fs2::FileExt;
use tracing::debug;

use crate::{Error, FileMode, NormalizedPath, Result};

/// Create a directory and any missing parents.
pub fn ensure_dir(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    fs::create_dir_all(&native).map_err(|e| Error::io(&native, e))
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so a failed run never leaves a partially
/// written file at the destination. An advisory lock guards against
/// concurrent writers of the same destination.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory so the rename stays on one filesystem.
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    Ok(())
}

/// Copy a source file to a destination and apply the given mode bits.
///
/// The content goes through [`write_atomic`], then the permissions are set
/// on the final path. On non-Unix hosts the mode is accepted but not applied.
pub fn copy_entry(source: &NormalizedPath, dest: &NormalizedPath, mode: FileMode) -> Result<()> {
    let content = fs::read(source.to_native()).map_err(|e| Error::io(source.to_native(), e))?;
    write_atomic(dest, &content)?;
    apply_mode(dest, mode)?;
    debug!(source = %source, dest = %dest, mode = %mode, "copied entry");
    Ok(())
}

/// Set permission bits on an existing file.
#[cfg(unix)]
pub fn apply_mode(path: &NormalizedPath, mode: FileMode) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let native = path.to_native();
    fs::set_permissions(&native, fs::Permissions::from_mode(mode.bits()))
        .map_err(|e| Error::io(&native, e))
}

/// Set permission bits on an existing file.
///
/// No-op off Unix; the mode stays recorded in the manifest and reports.
#[cfg(not(unix))]
pub fn apply_mode(_path: &NormalizedPath, _mode: FileMode) -> Result<()> {
    Ok(())
}

/// Read the permission bits of an existing file, if the platform exposes them.
#[cfg(unix)]
pub fn read_mode(path: &NormalizedPath) -> Result<Option<u32>> {
    use std::os::unix::fs::PermissionsExt;

    let native = path.to_native();
    let metadata = fs::metadata(&native).map_err(|e| Error::io(&native, e))?;
    Ok(Some(metadata.permissions().mode()))
}

/// Read the permission bits of an existing file, if the platform exposes them.
#[cfg(not(unix))]
pub fn read_mode(_path: &NormalizedPath) -> Result<Option<u32>> {
    Ok(None)
}
