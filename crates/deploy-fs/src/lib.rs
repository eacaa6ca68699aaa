//! Filesystem layer for the deployment manager
//!
//! Provides normalized path handling, octal file modes, checksums, and the
//! atomic I/O primitives the deployment engine writes through.

pub mod checksum;
pub mod error;
pub mod io;
pub mod mode;
pub mod path;

pub use error::{Error, Result};
pub use mode::FileMode;
pub use path::NormalizedPath;
