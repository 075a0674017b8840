//! Content hashing and format-specific corruption detection for cached
//! payloads.
//!
//! Every check degrades independently: an unreadable file, a missing media
//! probe or a format without a decoder produce sentinel values in the
//! [`Fingerprint`] rather than errors, and never mark a file as corrupt.

mod consts;
pub mod container;
pub mod error;
pub mod hash;
pub mod raster;
pub mod sniff;
pub mod video;
pub mod xml;

use std::path::Path;
use tracing::instrument;

pub use crate::container::ContainerVersion;
pub use crate::hash::Identity;
pub use crate::sniff::{Sniffed, sniff};
pub use crate::video::{Probe, VideoReport};

/// Outcome of a single format-specific check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrity {
    /// The check does not apply to this kind of file.
    #[default]
    NotApplicable,
    /// The check applies but could not be carried out.
    Unchecked,
    Intact,
    Corrupt,
}
impl Integrity {
    #[inline]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt)
    }
}

/// Everything the placement policies need to know about one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// Lowercase extension without the dot; empty when there is none.
    pub extension: String,
    pub size: Option<u64>,
    pub content_hash: Option<String>,
    pub container: ContainerVersion,
    pub image: Integrity,
    pub video: Integrity,
    pub xml: Integrity,
}
impl Fingerprint {
    pub fn identity(&self) -> Identity {
        Identity { size: self.size, hash: self.content_hash.clone() }
    }

    /// Empty, an SDAT without a recognised signature, or any format check
    /// that came back corrupt. Unknown values never count.
    pub fn is_corrupt(&self) -> bool {
        self.size == Some(0)
            || self.container == ContainerVersion::Unrecognized
            || self.image.is_corrupt()
            || self.video.is_corrupt()
            || self.xml.is_corrupt()
    }

    /// An SDAT of the known-mutated 3.3 revision.
    pub fn is_modified(&self) -> bool {
        self.container == ContainerVersion::V3_3
    }
}

/// Lowercase extension of `path` without the dot.
pub fn extension_of(path: impl AsRef<Path>) -> String {
    path.as_ref().extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default()
}

/// Runs every applicable check against a file.
#[derive(Debug, Clone, Default)]
pub struct Fingerprinter {
    probe: Option<Probe>,
}
impl Fingerprinter {
    pub fn new(probe: impl Into<Option<Probe>>) -> Self {
        Self { probe: probe.into() }
    }

    /// Fingerprints the file at `path`.
    ///
    /// Cached payloads are usually stored without an extension, so the
    /// format checks use the file's own extension when it has one and
    /// `fallback_extension` (from the logical path it will be archived under)
    /// otherwise. The video report, when the probe matched anything, is
    /// returned alongside.
    #[instrument(level = "debug", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn fingerprint(&self, path: impl AsRef<Path>, fallback_extension: &str) -> (Fingerprint, Option<VideoReport>) {
        let path = path.as_ref();
        let own = extension_of(path);
        let extension = if own.is_empty() { fallback_extension.to_lowercase() } else { own };
        let Identity { size, hash: content_hash } = Identity::of(path);

        let container = ContainerVersion::detect(path, &extension, size);
        let image = match extension.as_str() {
            e if raster::IMAGE_EXTENSIONS.contains(&e) => raster::check(path, e),
            _ => Integrity::NotApplicable,
        };
        let (video, report) = match extension.as_str() {
            e if video::VIDEO_EXTENSIONS.contains(&e) => video::check(self.probe.as_ref(), path),
            _ => (Integrity::NotApplicable, None),
        };
        let xml = match extension.as_str() {
            "xml" => xml::check(path),
            _ => Integrity::NotApplicable,
        };

        let fingerprint = Fingerprint { extension, size, content_hash, container, image, video, xml };
        tracing::debug!(
            size = ?fingerprint.size,
            hash = fingerprint.content_hash.as_deref().unwrap_or("ERROR"),
            container = %fingerprint.container,
            image = ?fingerprint.image,
            video = ?fingerprint.video,
            xml = ?fingerprint.xml,
            "Fingerprinted file"
        );
        (fingerprint, report)
    }
}
