//! Local filesystem archive backend.

use crate::backend::ArchiveBackend;
use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Archive stored in a directory on the local filesystem.
///
/// # Examples
///
/// ```no_run
/// use homecache_storage::backend::LocalArchive;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let archive = LocalArchive::new("archive", "/srv/home/ARCHIVE")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalArchive {
    name: String,
    /// Archive base directory
    root: PathBuf,
}
impl LocalArchive {
    /// Create a backend rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute or is not a directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            fs::create_dir_all(&root).map_err(|e| ErrorKind::from_io(e, &root))?;
        }
        Ok(Self { name: name.into(), root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn ensure_parent(abs_path: &Path, path: &Path) -> Result<()> {
        if let Some(parent) = abs_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ErrorKind::from_io(e, path))?;
        }
        Ok(())
    }
}

impl ArchiveBackend for LocalArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn locate(&self, path: &Path) -> Result<PathBuf> {
        self.absolute_path(path)
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        Ok(abs_path.try_exists().map_err(ErrorKind::Io)?)
    }

    fn import(&self, source: &Path, path: &Path) -> Result<u64> {
        let abs_path = self.absolute_path(path)?;
        Self::ensure_parent(&abs_path, path)?;
        let parent = abs_path.parent().unwrap_or(&self.root);

        let mut input = File::open(source).map_err(|e| ErrorKind::from_io(e, source))?;
        let modified = input.metadata().and_then(|m| m.modified()).map_err(|e| ErrorKind::from_io(e, source))?;
        let mut staged = NamedTempFile::new_in(parent).map_err(|e| ErrorKind::from_io(e, path))?;
        let bytes = io::copy(&mut input, &mut staged).map_err(|e| ErrorKind::from_io(e, path))?;
        staged.as_file().set_modified(modified).map_err(|e| ErrorKind::from_io(e, path))?;
        staged.persist(&abs_path).map_err(|e| ErrorKind::from_io(e.error, path))?;
        tracing::trace!(source = %source.display(), path = %path.display(), bytes, "Imported file into archive");
        Ok(bytes)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from_path = self.absolute_path(from)?;
        let to_path = self.absolute_path(to)?;
        if to_path.try_exists().map_err(ErrorKind::Io)? {
            exn::bail!(ErrorKind::AlreadyExists(to.to_path_buf()));
        }
        Self::ensure_parent(&to_path, to)?;
        fs::rename(&from_path, &to_path).map_err(|e| ErrorKind::from_io(e, from))?;
        tracing::trace!(from = %from.display(), to = %to.display(), "Renamed within archive");
        Ok(())
    }

    fn list_dirs(&self, path: Option<&Path>) -> Result<Vec<PathBuf>> {
        let (abs_path, relative) = match path {
            Some(p) => (self.absolute_path(p)?, validate_path(p)?),
            None => (self.root.clone(), PathBuf::new()),
        };
        let entries = match fs::read_dir(&abs_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => exn::bail!(ErrorKind::from_io(e, &abs_path)),
        };
        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(ErrorKind::Io)?;
            if entry.file_type().map_err(ErrorKind::Io)?.is_dir() {
                dirs.push(relative.join(entry.file_name()));
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}
