//! CLI Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A command error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command execution.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories. Every one of them ends the process with exit
/// code 1.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("unable to set up logging to {}", _0.display())]
    Logging(#[error(not(source))] PathBuf),
    #[display("unusable archive root: {}", _0.display())]
    ArchiveRoot(#[error(not(source))] PathBuf),
    #[display("manifest not found: {}", _0.display())]
    MissingManifest(#[error(not(source))] PathBuf),
    #[display("unable to read manifest")]
    Manifest,
    #[display("unable to load exception list: {}", _0.display())]
    Exceptions(#[error(not(source))] PathBuf),
    #[display("unable to normalize archive roots")]
    Normalize,
    #[display("custom query failed")]
    Query,
}
