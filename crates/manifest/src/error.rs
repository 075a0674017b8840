//! Manifest Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A manifest error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The manifest (or a query input) could not be opened or read.
    #[display("unable to read {}", _0.display())]
    Unreadable(#[error(not(source))] PathBuf),
    /// The query output could not be written.
    #[display("unable to write {}", _0.display())]
    Unwritable(#[error(not(source))] PathBuf),
    /// A manifest line has fewer than four `|`-separated fields.
    #[display("malformed manifest line: {_0}")]
    MalformedLine(#[error(not(source))] String),
    /// A URL resolved to a path that would escape the archive.
    #[display("URL does not resolve to a usable archive path: {_0}")]
    InvalidPath(#[error(not(source))] String),
    /// A query pattern failed to compile.
    #[display("invalid pattern: {_0}")]
    InvalidPattern(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreadable(_) | Self::Unwritable(_))
    }
}
