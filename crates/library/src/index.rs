use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DAT_MARKER: &str = "_DAT";

/// Cached payloads under a search root, keyed by the hash in their file name.
///
/// Payloads are named `{HASH}_DAT*` (`ABC123_DAT`, `ABC123_DAT0`,
/// `ABC123_DAT.mp4`, ...) and may live anywhere below the root. The tree is
/// walked once; lookups ignore case. A search root that is missing (or not a
/// directory) holds no payloads, so every lookup comes back empty.
#[derive(Debug, Default)]
pub struct CandidateIndex {
    files: HashMap<String, Vec<PathBuf>>,
}
impl CandidateIndex {
    pub fn build(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        if !root.is_dir() {
            tracing::warn!(root = %root.display(), "Search root is not a directory; no payloads will be found");
            return Self::default();
        }
        let mut files: HashMap<String, Vec<PathBuf>> = HashMap::new();
        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry in search root");
                    continue;
                },
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if let Some(key) = hash_key(&name) {
                files.entry(key).or_default().push(entry.into_path());
            }
        }
        for paths in files.values_mut() {
            paths.sort();
        }
        tracing::info!(root = %root.display(), hashes = files.len(), "Indexed search root");
        Self { files }
    }

    /// Candidates for `hash`, in path order.
    pub fn candidates(&self, hash: &str) -> &[PathBuf] {
        self.files.get(&hash.trim().to_uppercase()).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn hash_key(name: &str) -> Option<String> {
    let upper = name.to_uppercase();
    let at = upper.find(DAT_MARKER)?;
    (at > 0).then(|| upper[..at].to_string())
}
