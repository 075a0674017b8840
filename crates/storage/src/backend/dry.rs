//! Dry-run archive backend.
//!
//! Wraps another backend and drops every mutation while reporting success,
//! so a whole run can be rehearsed against a real archive.

use crate::backend::ArchiveBackend;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Dry-run archive backend.
///
/// Reads are forwarded to the wrapped backend; imports and renames are logged
/// as an [`info event`](tracing::Event) and skipped.
#[derive(Clone)]
pub struct DryRunArchive {
    inner: Arc<dyn ArchiveBackend>,
}
impl DryRunArchive {
    pub fn new(inner: Arc<dyn ArchiveBackend>) -> Self {
        Self { inner }
    }
}

impl ArchiveBackend for DryRunArchive {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn locate(&self, path: &Path) -> Result<PathBuf> {
        self.inner.locate(path)
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        self.inner.exists(path)
    }

    fn import(&self, source: &Path, path: &Path) -> Result<u64> {
        // Still reject paths the real backend would reject.
        self.inner.locate(path)?;
        let bytes = source.metadata().map(|m| m.len()).unwrap_or_default();
        tracing::info!(source = %source.display(), path = %path.display(), bytes, "Skipping import during dry run");
        Ok(bytes)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.inner.locate(to)?;
        tracing::info!(from = %from.display(), to = %to.display(), "Skipping rename during dry run");
        Ok(())
    }

    fn list_dirs(&self, path: Option<&Path>) -> Result<Vec<PathBuf>> {
        self.inner.list_dirs(path)
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalArchive;
    use std::fs;

    #[test]
    fn test_mutations_are_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let local = LocalArchive::new("archive", tmp.path().join("ARCHIVE")).unwrap();
        fs::write(local.root().join("main.xml"), b"old").unwrap();
        let source = tmp.path().join("ABC_DAT");
        fs::write(&source, b"new content").unwrap();

        let dry = DryRunArchive::new(Arc::new(local.clone()));
        assert_eq!(dry.import(&source, Path::new("other.xml")).unwrap(), 11);
        dry.rename(Path::new("main.xml"), Path::new("main-1.xml")).unwrap();

        assert!(dry.is_dry_run());
        assert!(dry.exists(Path::new("main.xml")).unwrap());
        assert!(!dry.exists(Path::new("other.xml")).unwrap());
        assert!(!dry.exists(Path::new("main-1.xml")).unwrap());
        assert!(dry.import(&source, Path::new("../escape")).is_err());
    }
}
