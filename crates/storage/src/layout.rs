use std::path::{Path, PathBuf};

/// Default name of the archive directory under the archive root.
pub const DEFAULT_ARCHIVE_DIR: &str = "ARCHIVE";
const DEBUG_LOG: &str = "log_DEBUG.log";
const VIDEO_LOG: &str = "log_VIDEO_ANALYSIS.log";

/// The three parallel trees inside the archive base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tree {
    Main,
    Corrupted,
    Modified,
}
impl Tree {
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::Main => None,
            Self::Corrupted => Some("corrupted"),
            Self::Modified => Some("modified"),
        }
    }

    pub const ALL: [Tree; 3] = [Tree::Main, Tree::Corrupted, Tree::Modified];
}

/// Where things live on disk for one run.
///
/// The archive *base* is `<root>/<archive dir>`, or
/// `<root>/<archive dir>/<query>/<cache>` for custom query runs. Everything
/// the run writes (archive trees, debug and video logs) lives under the base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    root: PathBuf,
    base: PathBuf,
}
impl ArchiveLayout {
    pub fn new(root: impl Into<PathBuf>, archive_dir: &str) -> Self {
        let root = root.into();
        let base = root.join(archive_dir);
        Self { root, base }
    }

    pub fn custom_query(root: impl Into<PathBuf>, archive_dir: &str, query: &str, cache: &str) -> Self {
        let root = root.into();
        let base = root.join(archive_dir).join(query).join(cache);
        Self { root, base }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Archive path (relative to the base) of a logical path in `tree`.
    pub fn in_tree(&self, tree: Tree, logical: impl AsRef<Path>) -> PathBuf {
        match tree.prefix() {
            Some(prefix) => Path::new(prefix).join(logical),
            None => logical.as_ref().to_path_buf(),
        }
    }

    pub fn debug_log(&self) -> PathBuf {
        self.base.join(DEBUG_LOG)
    }

    pub fn video_log(&self) -> PathBuf {
        self.base.join(VIDEO_LOG)
    }

    /// How a source file is written to the dupes log: relative to the archive
    /// root when it lives under it, otherwise as given.
    pub fn display_source(&self, source: &Path) -> String {
        source.strip_prefix(&self.root).unwrap_or(source).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_layout() {
        let layout = ArchiveLayout::new("/srv/home", DEFAULT_ARCHIVE_DIR);
        assert_eq!(layout.base(), Path::new("/srv/home/ARCHIVE"));
        assert_eq!(layout.in_tree(Tree::Main, "a/b.xml"), Path::new("a/b.xml"));
        assert_eq!(layout.in_tree(Tree::Corrupted, "a/b.xml"), Path::new("corrupted/a/b.xml"));
        assert_eq!(layout.in_tree(Tree::Modified, "a/b.xml"), Path::new("modified/a/b.xml"));
        assert_eq!(layout.debug_log(), Path::new("/srv/home/ARCHIVE/log_DEBUG.log"));
        assert_eq!(layout.video_log(), Path::new("/srv/home/ARCHIVE/log_VIDEO_ANALYSIS.log"));
    }

    #[test]
    fn test_custom_query_layout() {
        let layout = ArchiveLayout::custom_query("/srv/home", "ARCHIVE", "scenes", "cacheA");
        assert_eq!(layout.base(), Path::new("/srv/home/ARCHIVE/scenes/cacheA"));
        assert_eq!(layout.root(), Path::new("/srv/home"));
    }

    #[test]
    fn test_display_source() {
        let layout = ArchiveLayout::new("/srv/home", "ARCHIVE");
        assert_eq!(layout.display_source(Path::new("/srv/home/CACHE/ABC_DAT")), "CACHE/ABC_DAT");
        assert_eq!(layout.display_source(Path::new("/mnt/other/ABC_DAT")), "/mnt/other/ABC_DAT");
    }
}
