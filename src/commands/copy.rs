use crate::cli::CopyArgs;
use crate::commands::{open_backend, plain_layout};
use crate::error::{ErrorKind, Result};
use crate::logging;
use crate::summary::{self, Summary};
use exn::ResultExt;
use homecache_config::Config;
use homecache_fingerprint::{Fingerprinter, Probe};
use homecache_library::{
    CandidateIndex, Capabilities, Context, ExceptionSet, Options, Reports, RunEvent, normalize_roots, run,
};
use homecache_manifest::read_lines;
use homecache_storage::ArchiveLayout;
use homecache_storage::sidelog::{AppendLog, DateLog, sort_dupes};
use std::path::Path;
use std::time::Instant;

pub fn execute(args: CopyArgs, config: &Config) -> Result<()> {
    let started = summary::now();
    let clock = Instant::now();

    let cache = args.cache.trim().to_string();
    let layout = match args.customquery {
        true => {
            let plain = plain_layout(&args.archive_root, config)?;
            ArchiveLayout::custom_query(plain.root(), &config.archive_dir, &args.query, &cache)
        },
        false => plain_layout(&args.archive_root, config)?,
    };
    logging::init(args.debug.then(|| layout.debug_log()).as_deref())?;
    tracing::debug!(base = %layout.base().display(), dry_run = args.verbose, "Starting cache copy");

    if !args.manifest.is_file() {
        exn::bail!(ErrorKind::MissingManifest(args.manifest.clone()));
    }
    let lines = read_lines(&args.manifest).or_raise(|| ErrorKind::Manifest)?;

    let backend = open_backend(&layout, args.verbose)?;
    if config.normalize_roots
        && let Err(e) = normalize_roots(&backend)
    {
        tracing::warn!(error = ?e, "Unable to normalize archive roots; continuing");
    }

    let probe = match Probe::discover(&args.probe) {
        Ok(probe) => Some(probe.with_timeout(config.probe_timeout())),
        Err(e) => {
            tracing::warn!(probe = %args.probe.display(), error = ?e, "Media probe unavailable; video files will not be checked");
            None
        },
    };
    let index = CandidateIndex::build(&args.search_root);

    let capabilities = Capabilities {
        cdn_log: args.cdn_log.as_ref().map(|path| DateLog::new(path).read_only(args.verbose)),
        dc_log: args.dc_log.as_ref().map(|path| DateLog::new(path).read_only(args.verbose)),
        corrupt_exceptions: load_exceptions(args.corrupt_exceptions.as_deref())?,
        modified_exceptions: load_exceptions(args.modified_exceptions.as_deref())?,
        new_files_log: args.override_log.as_ref().map(AppendLog::new),
    };
    let reports = Reports {
        dupes: AppendLog::new(&args.dupes_log),
        no_file: AppendLog::new(&args.no_file_log),
        video: AppendLog::new(layout.video_log()),
    };
    let context = Context {
        backend,
        layout,
        index,
        fingerprinter: Fingerprinter::new(probe),
        reports,
        capabilities,
        options: Options {
            cache: Some(cache).filter(|c| !c.is_empty()),
            skip_incremental: args.skipincrcopy,
        },
    };

    let counters = run(&context, &lines, |event| match event {
        RunEvent::Started => tracing::info!(lines = lines.len(), "Processing manifest"),
        RunEvent::Copied(status) => println!("{status}"),
        RunEvent::Complete(counters) => tracing::info!(?counters, "Manifest processed"),
    });

    if config.sort_dupes
        && let Err(e) = sort_dupes(&args.dupes_log)
    {
        tracing::warn!(log = %args.dupes_log.display(), error = ?e, "Unable to sort dupes log");
    }
    if counters.lines > 0 {
        let summary = Summary { started, ended: summary::now(), elapsed: clock.elapsed(), counters };
        print!("{summary}");
        tracing::debug!("{summary}");
    }
    Ok(())
}

fn load_exceptions(path: Option<&Path>) -> Result<ExceptionSet> {
    let Some(path) = path else {
        return Ok(ExceptionSet::default());
    };
    let set = ExceptionSet::load(path).or_raise(|| ErrorKind::Exceptions(path.to_path_buf()))?;
    tracing::info!(list = %path.display(), hashes = set.len(), "Loaded exception list");
    Ok(set)
}
