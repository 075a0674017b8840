use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber.
///
/// Events go to stderr, filtered by `RUST_LOG` (warnings and errors when it
/// is unset). With a `debug_log`, everything down to DEBUG is also appended to
/// that file, without colours.
pub fn init(debug_log: Option<&Path>) -> Result<()> {
    let stderr = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)));

    let file = match debug_log {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).or_raise(|| ErrorKind::Logging(path.to_path_buf()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .or_raise(|| ErrorKind::Logging(path.to_path_buf()))?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false).with_filter(LevelFilter::DEBUG))
        },
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr)
        .with(file)
        .try_init()
        .or_raise(|| ErrorKind::Logging(debug_log.map(Path::to_path_buf).unwrap_or_default()))
}
