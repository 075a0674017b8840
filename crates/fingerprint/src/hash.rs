use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use sha1::{Digest, Sha1};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Byte size of the file at `path`.
pub fn size(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    Ok(fs::metadata(path).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?.len())
}

/// Streaming SHA-1 of the file at `path`, as 40 uppercase hex characters.
///
/// Exception lists and side logs produced by earlier tooling all use this
/// exact representation, so it must not change.
pub fn content_hash(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mut file = File::open(path).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0; CHUNK_SIZE];
    loop {
        let bytes = file.read(&mut buffer).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?;
        if bytes == 0 {
            break;
        }
        hasher.update(&buffer[..bytes]);
    }
    Ok(hex::encode_upper(hasher.finalize()))
}

/// The cheap part of a fingerprint: enough to tell whether two files hold the
/// same content, and which of them is bigger.
///
/// Unknown values (I/O failure) are `None`. Two identities only
/// [match](Self::same_content) when both hashes are known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub size: Option<u64>,
    pub hash: Option<String>,
}
impl Identity {
    /// Computes size and hash, swallowing I/O failures into `None`.
    pub fn of(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let size = size(path)
            .inspect_err(|e| tracing::debug!(path = %path.display(), error = ?e, "Unable to read file size"))
            .ok();
        let hash = content_hash(path)
            .inspect_err(|e| tracing::debug!(path = %path.display(), error = ?e, "Unable to hash file"))
            .ok();
        Self { size, hash }
    }

    pub fn same_content(&self, other: &Identity) -> bool {
        matches!((&self.hash, &other.hash), (Some(a), Some(b)) if a == b)
    }

    /// Strictly larger than `other`. An unknown size on this side is never
    /// larger; an unknown size on the other side counts as `-1`.
    pub fn larger_than(&self, other: &Identity) -> bool {
        match (self.size, other.size) {
            (Some(a), Some(b)) => a > b,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_known_hash() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        assert_eq!(content_hash(file.path()).unwrap(), "A9993E364706816ABA3E25717850C26C9CD0D89D");
        assert_eq!(size(file.path()).unwrap(), 3);
    }

    #[test]
    fn test_hash_spans_chunks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let data = vec![0x5a_u8; CHUNK_SIZE * 2 + 17];
        file.write_all(&data).unwrap();
        let expected = hex::encode_upper(Sha1::digest(&data));
        assert_eq!(content_hash(file.path()).unwrap(), expected);
        assert_eq!(expected.len(), 40);
    }

    #[test]
    fn test_missing_file_identity() {
        let dir = tempfile::tempdir().unwrap();
        let identity = Identity::of(dir.path().join("missing"));
        assert_eq!(identity, Identity::default());
        assert_eq!(identity.hash, None);
        // Unknown content never matches, not even other unknown content.
        assert!(!identity.same_content(&Identity::default()));
    }

    #[test]
    fn test_larger_than() {
        let small = Identity { size: Some(1), hash: None };
        let big = Identity { size: Some(2), hash: None };
        assert!(big.larger_than(&small));
        assert!(!small.larger_than(&big));
        assert!(!big.larger_than(&big.clone()));
        assert!(small.larger_than(&Identity::default()));
        assert!(!Identity::default().larger_than(&small));
    }
}
