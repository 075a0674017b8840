//! INF manifests.
//!
//! A manifest is a text file with one `HASH|URL|DATE|CACHE` record per line,
//! written by the cache extraction tooling. This crate parses those records,
//! resolves their URLs to archive paths and filters manifests for custom
//! queries.

pub mod date;
pub mod error;
pub mod query;
pub mod resolve;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::path::Path;

pub use crate::date::CaptureDate;
pub use crate::query::CustomQuery;
pub use crate::resolve::{REGION_HOSTS, Resolved, resolve};

/// One manifest record. Fields are trimmed; anything after the fourth field is
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub hash: String,
    pub url: String,
    /// As written: `05Jan2012`, `null` or garbage.
    pub raw_date: String,
    pub cache: String,
}
impl ManifestEntry {
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.trim().split('|').map(str::trim).collect();
        let [hash, url, raw_date, cache, ..] = fields.as_slice() else {
            exn::bail!(ErrorKind::MalformedLine(line.to_string()));
        };
        Ok(Self {
            hash: hash.to_string(),
            url: url.to_string(),
            raw_date: raw_date.to_string(),
            cache: cache.to_string(),
        })
    }

    pub fn capture_date(&self) -> Option<CaptureDate> {
        CaptureDate::parse(&self.raw_date)
    }

    /// Whether the record was captured by `cache`, ignoring case.
    pub fn belongs_to(&self, cache: &str) -> bool {
        self.cache.eq_ignore_ascii_case(cache.trim())
    }

    /// The record as written to the new-files log, with the URL replaced by
    /// the path the file was archived under.
    pub fn override_line(&self, logical: &str) -> String {
        format!("{}|{logical}|{}|{}", self.hash, self.raw_date, self.cache)
    }
}

/// Reads the lines of a manifest. Invalid UTF-8 is replaced rather than
/// rejected.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = fs::read(path).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?;
    Ok(String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect())
}
