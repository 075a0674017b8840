//! Fingerprint Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Errors never leave [`Fingerprinter::fingerprint`](crate::Fingerprinter::fingerprint):
//! each failing check collapses into a sentinel value there. They are public
//! for callers that want to run an individual check and see why it failed.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A fingerprint error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fingerprint operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file could not be opened or read.
    #[display("unable to read file: {}", _0.display())]
    Unreadable(#[error(not(source))] PathBuf),
    /// The configured media probe is neither a file nor an executable on `PATH`.
    #[display("media probe not found: {}", _0.display())]
    ProbeNotFound(#[error(not(source))] PathBuf),
    /// The media probe did not finish within the configured timeout.
    #[display("media probe timed out after {_0} seconds")]
    ProbeTimeout(#[error(not(source))] u64),
    /// Spawning or talking to the media probe process failed.
    ProbeFailed,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProbeTimeout(_))
    }
}
