//! Error types for the [`place`](super) module.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A placement error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for placement operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a placement failure.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// An archive backend operation (stat, import, rename) failed.
    #[display("archive operation failed")]
    Storage,
    /// A dupes, date or new-files log could not be read or written.
    #[display("side log operation failed")]
    SideLog,
    /// Every numbered slot for this path is taken. Nothing is overwritten.
    #[display("no free slot left for {}", _0.display())]
    SlotsExhausted(#[error(not(source))] PathBuf),
    /// Something other than a regular file occupies an archive slot.
    #[display("archive slot is not a file: {}", _0.display())]
    NotAFile(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage | Self::SideLog)
    }
}
