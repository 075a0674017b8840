use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Trailing 16-byte signatures of the SDAT container, paired with the version
/// they identify.
pub(crate) const SDAT_SIGNATURES: [(&[u8; 16], &str); 4] = [
    (b"SDATA 4.0.0.W\x00\x00\x00", "4.0"),
    (b"SDATA 2.4.0.W\x00\x00\x00", "2.4"),
    (b"SDATA 2.2.0.W\x00\x00\x00", "2.2"),
    (b"SDATA 3.3.0.W\x00\x00\x00", "3.3"),
];

/// Substrings (matched case-insensitively) that mark a media probe diagnostic
/// line as an error.
pub(crate) const VIDEO_ERRORS: [&str; 11] = [
    "moov atom not found",
    "contradictory STSC and STCO",
    "error reading header",
    "Invalid data found when processing input",
    "corrupt",
    "error",
    "invalid",
    "malformed",
    "missing",
    "missing picture in access unit with size 5",
    "partial file",
];

/// The one diagnostic that is tolerated when it is the only thing reported.
pub(crate) const BENIGN_VIDEO_ERROR: &str = "missing picture in access unit with size 5";

/// Root tags of the XML documents served by the Home CDN. Matching is
/// case-insensitive, so the list only carries lowercase names.
pub(crate) const XML_ROOT_TAGS: [&str; 11] = [
    "commerce_point",
    "xml",
    "regioninfo",
    "rss",
    "localisation",
    "eula",
    "active_objects",
    "videos",
    "media",
    "weather",
    "ticker",
];

/// `(self-closing, open, close)` patterns for every root tag, in catalog order.
pub(crate) static XML_ROOT_PATTERNS: LazyLock<Vec<(Regex, Regex, Regex)>> = LazyLock::new(|| {
    XML_ROOT_TAGS
        .iter()
        .map(|tag| {
            (
                Regex::new(&format!(r"(?i)<\s*{tag}\b[^>]*/\s*>")).unwrap(),
                Regex::new(&format!(r"(?i)<\s*{tag}\b[^>]*>")).unwrap(),
                Regex::new(&format!(r"(?i)</\s*{tag}\s*>")).unwrap(),
            )
        })
        .collect()
});

// Payload markers used when guessing the type of an extensionless file.
regex!(XML_PAYLOAD_REGEX, r"(?i)<(?:\?xml|xml|rss|profile)");
