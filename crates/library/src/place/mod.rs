//! Placement of one candidate payload into the archive.
//!
//! A candidate is [classified](classify) once, and the first matching
//! [`Category`] decides the policy; there is no fallthrough between policies.
//!
//! | Category | Target | Collision rule |
//! |---|---|---|
//! | [`Corrupt`](Category::Corrupt) | `corrupted/<path>` | larger sample wins |
//! | [`Modified`](Category::Modified) | `modified/<path>` | any different content overwrites |
//! | [`DateCollision`](Category::DateCollision) | main | newer capture date wins |
//! | [`CdnVersioned`](Category::CdnVersioned) | main, dated and numbered slots | newest date holds main |
//! | [`SizeWins`](Category::SizeWins) | main | larger file wins |
//! | [`Numbered`](Category::Numbered) | main and numbered slots | larger file holds main |
//!
//! Archive occupants are only ever compared by size and SHA-1.

mod cdn;
mod dated;
pub mod error;
mod numbered;
mod sized;
mod tree;
mod writer;

pub(crate) use self::writer::ArchiveWriter;
use crate::Capabilities;
use crate::place::error::{ErrorKind, Result};
use derive_more::Display;
use homecache_fingerprint::{Fingerprint, Identity};
use homecache_manifest::{CaptureDate, ManifestEntry};
use std::path::{Path, PathBuf};

/// Numbered slots tried for the default policy (`-1` to `-99`).
pub const MAX_NUMBERED_SLOTS: usize = 100;
/// Numbered slots tried per family for CDN-versioned files (`-1` to `-499`).
pub const MAX_CDN_SLOTS: usize = 500;

const DATE_COLLISION_EXTENSIONS: [&str; 2] = ["odc", "sdc"];
const CDN_EXTENSIONS: [&str; 7] = ["xml", "json", "txt", "hcdb", "bar", "sharc", "bin"];
const SIZE_WINS_EXTENSIONS: [&str; 1] = ["mp3"];
const OVERRIDE_EXTENSIONS: [&str; 3] = ["sdat", "bar", "png"];

/// Placement policy for a candidate.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    #[display("corrupt")]
    Corrupt,
    #[display("modified")]
    Modified,
    #[display("date-collision")]
    DateCollision,
    #[display("cdn")]
    CdnVersioned,
    #[display("size-wins")]
    SizeWins,
    #[display("numbered")]
    Numbered,
}
impl Category {
    /// Whether copies land in the main tree (and so in the new-files log).
    pub fn is_main_tree(&self) -> bool {
        !matches!(self, Self::Corrupt | Self::Modified)
    }
}

/// Why a candidate was left out of the archive without being a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Date-ordered files need a capture date.
    NoDate,
    /// The archived version is at least as recent.
    NotNewer,
    /// The archived version is at least as large.
    NotLarger,
}

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Copied to `slot` (archive path relative to the base).
    Copied { slot: PathBuf, category: Category },
    /// Identical content already lives at `slot`.
    Duplicate { slot: PathBuf },
    Skipped(SkipReason),
    /// Placement failed; the error has been logged.
    Failed,
}

/// One candidate payload and everything known about it.
#[derive(Debug)]
pub struct Incoming<'a> {
    pub entry: &'a ManifestEntry,
    /// The effective cache name for this line.
    pub cache: &'a str,
    pub source: &'a Path,
    /// Validated logical path.
    pub logical: &'a Path,
    pub logical_str: &'a str,
    /// Lowercase extension of the logical path, without the dot.
    pub extension: &'a str,
    pub fingerprint: &'a Fingerprint,
    pub date: Option<CaptureDate>,
}
impl Incoming<'_> {
    pub fn identity(&self) -> Identity {
        self.fingerprint.identity()
    }
}

/// Picks the policy for a candidate. Forced corruption wins over forced
/// modification, and both win over the fingerprint.
pub fn classify(fingerprint: &Fingerprint, extension: &str, capabilities: &Capabilities) -> Category {
    let hash = fingerprint.content_hash.as_deref();
    if capabilities.corrupt_exceptions.contains(hash) || fingerprint.is_corrupt() {
        return Category::Corrupt;
    }
    if capabilities.modified_exceptions.contains(hash) || fingerprint.is_modified() {
        return Category::Modified;
    }
    if capabilities.dc_log.is_some() && DATE_COLLISION_EXTENSIONS.contains(&extension) {
        return Category::DateCollision;
    }
    if capabilities.cdn_log.is_some() && CDN_EXTENSIONS.contains(&extension) {
        return Category::CdnVersioned;
    }
    if SIZE_WINS_EXTENSIONS.contains(&extension)
        || (capabilities.new_files_log.is_some() && OVERRIDE_EXTENSIONS.contains(&extension))
    {
        return Category::SizeWins;
    }
    Category::Numbered
}

/// Places a classified candidate.
pub(crate) fn place(writer: &mut ArchiveWriter<'_>, incoming: &Incoming<'_>, category: Category) -> Result<Outcome> {
    let capabilities = &writer.context().capabilities;
    match category {
        Category::Corrupt => tree::place_corrupt(writer, incoming),
        Category::Modified => tree::place_modified(writer, incoming),
        Category::DateCollision => match &capabilities.dc_log {
            Some(log) => dated::place(writer, incoming, log),
            None => numbered::place(writer, incoming),
        },
        Category::CdnVersioned => match &capabilities.cdn_log {
            Some(log) => cdn::place(writer, incoming, log),
            None => numbered::place(writer, incoming),
        },
        Category::SizeWins => sized::place(writer, incoming),
        Category::Numbered => numbered::place(writer, incoming),
    }
}

/// Result of walking a slot family until its first free slot.
#[derive(Debug, Default)]
pub(crate) struct FamilyScan {
    /// An occupied slot with the incoming content.
    pub duplicate: Option<PathBuf>,
    /// The first free slot.
    pub free: Option<PathBuf>,
}

/// Walks `slots` in order, stopping at the first free slot or the first slot
/// holding `identity`. Families are filled from the front and never thinned,
/// so nothing lives past the first gap.
pub(crate) fn scan_family(
    writer: &ArchiveWriter<'_>,
    slots: impl IntoIterator<Item = PathBuf>,
    identity: Option<&Identity>,
) -> Result<FamilyScan> {
    for slot in slots {
        match writer.existing(&slot)? {
            None => return Ok(FamilyScan { duplicate: None, free: Some(slot) }),
            Some(occupant) if identity.is_some_and(|i| i.same_content(&occupant)) => {
                return Ok(FamilyScan { duplicate: Some(slot), free: None });
            },
            Some(_) => {},
        }
    }
    Ok(FamilyScan::default())
}

/// The first free slot of a family, or [`ErrorKind::SlotsExhausted`].
pub(crate) fn first_free(
    writer: &ArchiveWriter<'_>,
    slots: impl IntoIterator<Item = PathBuf>,
    family: &Path,
) -> Result<PathBuf> {
    match scan_family(writer, slots, None)?.free {
        Some(slot) => Ok(slot),
        None => exn::bail!(ErrorKind::SlotsExhausted(family.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExceptionSet;
    use homecache_fingerprint::{ContainerVersion, Integrity};
    use homecache_storage::sidelog::{AppendLog, DateLog};
    use rstest::rstest;

    fn fingerprint(extension: &str) -> Fingerprint {
        Fingerprint {
            extension: extension.to_string(),
            size: Some(10),
            content_hash: Some("AAAA".to_string()),
            container: ContainerVersion::NotApplicable,
            image: Integrity::NotApplicable,
            video: Integrity::NotApplicable,
            xml: Integrity::NotApplicable,
        }
    }

    fn full() -> Capabilities {
        Capabilities {
            cdn_log: Some(DateLog::new("cdn.log")),
            dc_log: Some(DateLog::new("dc.log")),
            new_files_log: Some(AppendLog::new("new.log")),
            ..Capabilities::default()
        }
    }

    #[rstest]
    #[case("odc", Category::DateCollision)]
    #[case("sdc", Category::DateCollision)]
    #[case("xml", Category::CdnVersioned)]
    #[case("bar", Category::CdnVersioned)]
    #[case("mp3", Category::SizeWins)]
    #[case("sdat", Category::SizeWins)]
    #[case("png", Category::SizeWins)]
    #[case("jpg", Category::Numbered)]
    #[case("", Category::Numbered)]
    fn test_classify_with_capabilities(#[case] extension: &str, #[case] expected: Category) {
        assert_eq!(classify(&fingerprint(extension), extension, &full()), expected);
    }

    #[rstest]
    #[case("odc", Category::Numbered)]
    #[case("xml", Category::Numbered)]
    #[case("mp3", Category::SizeWins)]
    #[case("png", Category::Numbered)]
    fn test_classify_without_capabilities(#[case] extension: &str, #[case] expected: Category) {
        assert_eq!(classify(&fingerprint(extension), extension, &Capabilities::default()), expected);
    }

    #[test]
    fn test_forced_classification() {
        let mut capabilities = full();
        capabilities.modified_exceptions = ExceptionSet::parse("aaaa");
        assert_eq!(classify(&fingerprint("xml"), "xml", &capabilities), Category::Modified);
        capabilities.corrupt_exceptions = ExceptionSet::parse("AAAA");
        assert_eq!(classify(&fingerprint("xml"), "xml", &capabilities), Category::Corrupt);
    }

    #[test]
    fn test_fingerprint_classification() {
        let mut corrupt = fingerprint("png");
        corrupt.image = Integrity::Corrupt;
        assert_eq!(classify(&corrupt, "png", &full()), Category::Corrupt);

        let mut modified = fingerprint("sdat");
        modified.container = ContainerVersion::V3_3;
        assert_eq!(classify(&modified, "sdat", &full()), Category::Modified);

        let mut unknown = fingerprint("png");
        unknown.image = Integrity::Unchecked;
        unknown.size = None;
        assert_eq!(classify(&unknown, "png", &Capabilities::default()), Category::Numbered);
    }
}
