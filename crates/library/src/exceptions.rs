use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

/// Content hashes whose classification is forced regardless of fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet(HashSet<String>);
impl ExceptionSet {
    /// Loads one hash per line. A missing file is an empty set.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(bytes) => Ok(Self::parse(&String::from_utf8_lossy(&bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Exception list not found; using an empty set");
                Ok(Self::default())
            },
            Err(e) => Err(e).or_raise(|| ErrorKind::Exceptions(path.to_path_buf())),
        }
    }

    pub fn parse(text: &str) -> Self {
        Self(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_uppercase).collect())
    }

    pub fn contains(&self, hash: Option<&str>) -> bool {
        hash.is_some_and(|h| self.0.contains(&h.to_uppercase()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
