//! Logical path validation.
//!
//! Logical paths come straight out of manifest URLs, so they are untrusted
//! input. Everything that turns one into a filesystem location goes through
//! [`validate`] first.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a logical path and returns it normalized, relative to the archive
/// base.
///
/// `..` may only cancel out components that came before it; a path that would
/// climb above the archive base is rejected, as are NUL bytes, Windows
/// prefixes and paths that normalize to nothing.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use homecache_storage::validate_path;
/// assert!(validate_path("scee-home.playstation.net/objects/foo.xml").is_ok());
/// assert!(validate_path("objects/../scenes/bar.sdc").is_ok());
/// assert!(validate_path("../outside.xml").is_err());
/// assert!(validate_path("a/../../b").is_err());
/// assert!(validate_path("a\0b").is_err());
/// assert_eq!(
///     validate_path("/objects//./foo/../bar.xml/").unwrap(),
///     Path::new("objects/bar.xml")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                // NUL survives `Path::components()` on unix but truncates in syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("scee-home.playstation.net/objects/foo/bar.xml", "scee-home.playstation.net/objects/foo/bar.xml")]
    #[case("img-profile-avatars/avatar-1.jpg", "img-profile-avatars/avatar-1.jpg")]
    #[case("a//b//c", "a/b/c")]
    #[case("a/./b/./c", "a/b/c")]
    #[case("a/b/..", "a")]
    #[case("/leading/slash.xml", "leading/slash.xml")]
    #[case("trailing/slash/", "trailing/slash")]
    fn test_valid_paths(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate(input).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("../etc/passwd")]
    #[case("a/../../b")]
    #[case("..")]
    #[case("a\0b")]
    #[case("")]
    #[case(".")]
    #[case("//")]
    fn test_invalid_paths(#[case] input: &str) {
        let err = validate(input).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }
}
