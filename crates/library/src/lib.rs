//! The homecache archiving engine.
//!
//! For every manifest line the engine locates the cached payloads named after
//! the line's hash, fingerprints each one, picks a placement policy from the
//! fingerprint and the archive path's extension, and copies the payload into
//! the archive (or records it as a duplicate).
//!
//! - [`run`] drives a whole manifest and reports [`RunEvent`]s.
//! - [`process_entry`] handles a single manifest record.
//! - [`normalize_roots`] renames legacy regional root folders.
//!
//! Everything here is sequential and assumes a single writer per archive base;
//! slot allocation and date-log updates read the archive and then act on it.

pub mod error;
mod exceptions;
mod index;
mod normalize;
pub mod place;
mod run;
#[cfg(test)]
mod tests;

pub use crate::exceptions::ExceptionSet;
pub use crate::index::CandidateIndex;
pub use crate::normalize::{Normalized, normalize_roots};
pub use crate::place::{Category, Outcome, SkipReason};
pub use crate::run::{RunEvent, StatusLine, process_entry, run};

use homecache_fingerprint::Fingerprinter;
use homecache_storage::sidelog::{AppendLog, DateLog};
use homecache_storage::{ArchiveLayout, BackendHandle};

/// Logs every run writes to, dry run or not.
#[derive(Debug, Clone)]
pub struct Reports {
    /// `cache\tsource\tlogical` for every payload already archived.
    pub dupes: AppendLog,
    /// `cache\t{hash}_INF\tlogical` for every line without a payload.
    pub no_file: AppendLog,
    /// Media probe findings.
    pub video: AppendLog,
}

/// Optional behaviour, switched on by providing its log or list.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    /// Enables date-versioned placement for CDN text and binary formats.
    pub cdn_log: Option<DateLog>,
    /// Enables date-ordered placement for `.odc` and `.sdc`.
    pub dc_log: Option<DateLog>,
    pub corrupt_exceptions: ExceptionSet,
    pub modified_exceptions: ExceptionSet,
    /// Override mode: main-tree copies are recorded here, and `.sdat`, `.bar`
    /// and `.png` keep only the largest version.
    pub new_files_log: Option<AppendLog>,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Only process lines captured by this cache. When absent every line is
    /// processed under its own cache name.
    pub cache: Option<String>,
    /// Always target the main slot instead of allocating numbered duplicates.
    pub skip_incremental: bool,
}

/// Everything a run needs, threaded through every call.
pub struct Context {
    pub backend: BackendHandle,
    pub layout: ArchiveLayout,
    pub index: CandidateIndex,
    pub fingerprinter: Fingerprinter,
    pub reports: Reports,
    pub capabilities: Capabilities,
    pub options: Options,
}
impl Context {
    pub fn is_dry_run(&self) -> bool {
        self.backend.is_dry_run()
    }
}

/// Running totals for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Manifest lines that matched the cache filter.
    pub lines: u64,
    /// Every copy, whatever the tree.
    pub copied: u64,
    pub corrupt: u64,
    pub modified: u64,
    pub dupes: u64,
    /// Lines whose hash matched more than one payload.
    pub multi_match: u64,
}
