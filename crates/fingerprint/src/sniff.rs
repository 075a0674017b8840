use crate::consts::XML_PAYLOAD_REGEX;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const SNIFF_LEN: u64 = 2048;

/// Payload type guessed from the leading bytes of an extensionless file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sniffed {
    Json,
    Xml,
}
impl Sniffed {
    /// The extension to append, with its leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => ".json",
            Self::Xml => ".xml",
        }
    }
}

/// Guesses the payload type from the first 2 KiB of the file at `path`.
pub fn sniff(path: impl AsRef<Path>) -> Option<Sniffed> {
    let path = path.as_ref();
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    let read = File::open(path).and_then(|f| f.take(SNIFF_LEN).read_to_end(&mut head));
    if let Err(e) = read {
        tracing::debug!(path = %path.display(), error = %e, "Unable to sniff payload");
        return None;
    }
    sniff_bytes(&head)
}

pub(crate) fn sniff_bytes(head: &[u8]) -> Option<Sniffed> {
    let text = String::from_utf8_lossy(head);
    let text = text.trim();
    if text.starts_with('{') || text.starts_with('[') {
        Some(Sniffed::Json)
    } else if text.starts_with('<') && XML_PAYLOAD_REGEX.is_match(text) {
        Some(Sniffed::Xml)
    } else {
        None
    }
}
