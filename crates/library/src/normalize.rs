//! Renames legacy regional root folders (`scee/`, `scea/`, ...) to their
//! canonical host names in the archive base and in the corrupted and modified
//! trees.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use homecache_manifest::REGION_HOSTS;
use homecache_storage::error::ErrorKind as StorageErrorKind;
use homecache_storage::{BackendHandle, Tree};
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// What happened to one legacy folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Renamed { from: PathBuf, to: PathBuf },
    /// The canonical folder already exists; the legacy one is left alone.
    Conflict { from: PathBuf, to: PathBuf },
}

/// Renames every legacy root folder found. Running it again is a no-op.
pub fn normalize_roots(backend: &BackendHandle) -> Result<Vec<Normalized>> {
    let mut outcomes = Vec::new();
    for tree in Tree::ALL {
        let parent = tree.prefix().map(Path::new);
        let dirs = backend.list_dirs(parent).or_raise(|| ErrorKind::Normalize)?;
        for dir in dirs {
            let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let Some((_, canonical)) = REGION_HOSTS.iter().find(|(token, _)| *token == name) else {
                continue;
            };
            let to = dir.with_file_name(canonical);
            match backend.rename(&dir, &to) {
                Ok(()) => {
                    tracing::info!(from = %dir.display(), to = %to.display(), "Renamed legacy root folder");
                    outcomes.push(Normalized::Renamed { from: dir, to });
                },
                Err(e) if matches!(e.deref(), StorageErrorKind::AlreadyExists(_)) => {
                    tracing::warn!(from = %dir.display(), to = %to.display(), "Canonical root folder already exists; skipping");
                    outcomes.push(Normalized::Conflict { from: dir, to });
                },
                Err(e) => return Err(e).or_raise(|| ErrorKind::Normalize),
            }
        }
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use homecache_storage::backend::LocalArchive;
    use std::fs;
    use std::sync::Arc;

    #[test]
    fn test_normalize_roots() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("ARCHIVE");
        fs::create_dir_all(base.join("scee/objects")).unwrap();
        fs::write(base.join("scee/objects/a.xml"), b"<rss/>").unwrap();
        fs::create_dir_all(base.join("corrupted/scej")).unwrap();
        fs::create_dir_all(base.join("modified/sceasia")).unwrap();
        fs::create_dir_all(base.join("modified/sceasia-home.playstation.net")).unwrap();
        fs::create_dir_all(base.join("other")).unwrap();
        let backend: BackendHandle = Arc::new(LocalArchive::new("archive", &base).unwrap());

        let outcomes = normalize_roots(&backend).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(base.join("scee-home.playstation.net/objects/a.xml").is_file());
        assert!(base.join("corrupted/scej-home.playstation.net").is_dir());
        assert!(base.join("modified/sceasia").is_dir());
        assert!(outcomes.contains(&Normalized::Conflict {
            from: PathBuf::from("modified/sceasia"),
            to: PathBuf::from("modified/sceasia-home.playstation.net"),
        }));

        let again = normalize_roots(&backend).unwrap();
        assert!(again.iter().all(|o| matches!(o, Normalized::Conflict { .. })));
    }
}
