use std::path::{Path, PathBuf};

/// The family of archive slots one logical path may occupy.
///
/// For `dir/name.xml`:
///
/// | Slot | Name |
/// |---|---|
/// | main | `dir/name.xml` |
/// | numbered | `dir/name-3.xml` |
/// | dated | `dir/name_2012-01-05.xml` |
/// | dated + numbered | `dir/name_2012-01-05-3.xml` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots {
    dir: PathBuf,
    stem: String,
    /// Extension including its dot, or empty.
    suffix: String,
}
impl Slots {
    pub fn of(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let suffix = path.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();
        Self { dir, stem, suffix }
    }

    fn named(&self, name: String) -> PathBuf {
        self.dir.join(name)
    }

    pub fn main(&self) -> PathBuf {
        self.named(format!("{}{}", self.stem, self.suffix))
    }

    pub fn numbered(&self, n: usize) -> PathBuf {
        self.named(format!("{}-{n}{}", self.stem, self.suffix))
    }

    pub fn dated(&self, date: &str) -> PathBuf {
        self.named(format!("{}_{date}{}", self.stem, self.suffix))
    }

    pub fn dated_numbered(&self, date: &str, n: usize) -> PathBuf {
        self.named(format!("{}_{date}-{n}{}", self.stem, self.suffix))
    }
}
