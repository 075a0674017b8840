//! Archive tree access for homecache.
//!
//! - [`backend`]: the [`ArchiveBackend`] trait with a local and a dry-run
//!   implementation.
//! - [`Slots`]: naming of main, numbered and dated slots for a logical path.
//! - [`ArchiveLayout`]: where the archive base and run logs live.
//! - [`sidelog`]: append-only and rewrite-in-place text logs.

pub mod backend;
pub mod error;
mod layout;
mod path;
pub mod sidelog;
mod slot;

pub use crate::backend::ArchiveBackend;
pub use crate::layout::{ArchiveLayout, DEFAULT_ARCHIVE_DIR, Tree};
pub use crate::path::validate as validate_path;
pub use crate::slot::Slots;
use std::sync::Arc;

pub type BackendHandle = Arc<dyn ArchiveBackend>;
