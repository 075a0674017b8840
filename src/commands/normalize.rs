use crate::cli::NormalizeArgs;
use crate::commands::{open_backend, plain_layout};
use crate::error::{ErrorKind, Result};
use crate::logging;
use exn::ResultExt;
use homecache_config::Config;
use homecache_library::{Normalized, normalize_roots};

pub fn execute(args: NormalizeArgs, config: &Config) -> Result<()> {
    logging::init(None)?;
    let layout = plain_layout(&args.archive_root, config)?;
    let backend = open_backend(&layout, args.verbose)?;
    let prefix = if args.verbose { "[VERBOSE] " } else { "" };

    let outcomes = normalize_roots(&backend).or_raise(|| ErrorKind::Normalize)?;
    if outcomes.is_empty() {
        println!("{prefix}Nothing to rename in {}", layout.base().display());
    }
    for outcome in outcomes {
        match outcome {
            Normalized::Renamed { from, to } => println!("{prefix}RENAMED {} -> {}", from.display(), to.display()),
            Normalized::Conflict { from, to } => {
                println!("{prefix}SKIPPED {} ({} already exists)", from.display(), to.display())
            },
        }
    }
    Ok(())
}
