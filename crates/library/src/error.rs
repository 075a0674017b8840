//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which part of a run failed.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// An exception list exists but could not be read.
    #[display("unable to read exception list {}", _0.display())]
    Exceptions(#[error(not(source))] PathBuf),
    /// Legacy root folders could not be listed or renamed.
    #[display("unable to normalize archive roots")]
    Normalize,
    /// A side log could not be written.
    #[display("unable to write side log")]
    SideLog,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SideLog)
    }
}
