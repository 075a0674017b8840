//! One module per subcommand.

pub mod copy;
pub mod normalize;
pub mod query;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use homecache_config::Config;
use homecache_storage::backend::{DryRunArchive, LocalArchive};
use homecache_storage::{ArchiveLayout, BackendHandle};
use std::path::{self, Path};
use std::sync::Arc;

/// The plain layout for an archive root given on the command line.
fn plain_layout(archive_root: &Path, config: &Config) -> Result<ArchiveLayout> {
    let root = path::absolute(archive_root).or_raise(|| ErrorKind::ArchiveRoot(archive_root.to_path_buf()))?;
    Ok(ArchiveLayout::new(root, &config.archive_dir))
}

/// The local archive at the layout's base, wrapped for a dry run if asked.
fn open_backend(layout: &ArchiveLayout, dry_run: bool) -> Result<BackendHandle> {
    let base = layout.base();
    let local: BackendHandle =
        Arc::new(LocalArchive::new("archive", base).or_raise(|| ErrorKind::ArchiveRoot(base.to_path_buf()))?);
    let backend: BackendHandle = match dry_run {
        true => Arc::new(DryRunArchive::new(local)),
        false => local,
    };
    Ok(backend)
}
