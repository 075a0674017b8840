use crate::Integrity;
use crate::consts::XML_ROOT_PATTERNS;
use std::fs;
use std::path::Path;

/// Checks the root element of the XML document at `path` is balanced.
///
/// Only the known root tags are considered, in catalog order, and the first
/// one found decides. A document carrying none of them is accepted.
pub fn check(path: impl AsRef<Path>) -> Integrity {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => check_text(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Unable to read XML document");
            Integrity::Unchecked
        },
    }
}

pub(crate) fn check_text(text: &str) -> Integrity {
    for (self_closing, open, close) in XML_ROOT_PATTERNS.iter() {
        if self_closing.is_match(text) {
            return Integrity::Intact;
        }
        if open.is_match(text) {
            return if close.is_match(text) { Integrity::Intact } else { Integrity::Corrupt };
        }
    }
    Integrity::Intact
}
