//! Archive backend trait and implementations.
//!
//! The archive is a plain directory tree. All paths handed to an
//! [`ArchiveBackend`] are relative to the archive base and are validated with
//! [`validate_path`](crate::validate_path) before they touch the filesystem.
//!
//! # Single writer
//! Slot allocation reads the tree and then acts on it. Nothing here locks;
//! exactly one process may write to a given archive base at a time.

mod dry;
mod local;

pub use self::dry::DryRunArchive;
pub use self::local::LocalArchive;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Unified interface for archive mutations.
///
/// The core only ever adds files to the archive or moves them aside. There is
/// deliberately no delete: superseded files are renamed, never removed.
pub trait ArchiveBackend: Send + Sync {
    /// Name of the backend, for logging.
    fn name(&self) -> &str;

    /// Absolute filesystem location of an archive path.
    ///
    /// Fails with [`InvalidPath`](crate::error::ErrorKind::InvalidPath) when
    /// the path escapes the archive base.
    fn locate(&self, path: &Path) -> Result<PathBuf>;

    /// Check if a file (or directory) exists at an archive path.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Copy a file from outside the archive to an archive path, replacing
    /// anything already there, and return the number of bytes copied.
    ///
    /// # Notes
    /// - Parent directories are created as needed.
    /// - The source modification time is preserved.
    /// - Readers never observe a partially written destination.
    fn import(&self, source: &Path, path: &Path) -> Result<u64>;

    /// Rename a file or directory within the archive.
    ///
    /// Fails with [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists)
    /// rather than overwriting an occupied destination.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Immediate subdirectories of `path` (or of the archive base), as archive
    /// paths. A missing directory has no subdirectories.
    fn list_dirs(&self, path: Option<&Path>) -> Result<Vec<PathBuf>>;

    /// Whether mutations are actually carried out.
    fn is_dry_run(&self) -> bool {
        false
    }
}
