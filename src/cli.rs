use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Archives PS Home CDN cache captures into a deduplicated, versioned archive.
#[derive(Debug, Parser)]
#[command(name = "homecache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file to use instead of the one in the platform
    /// configuration directory.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Archive every cached payload named by a manifest.
    Copy(CopyArgs),
    /// Rename legacy regional root folders inside an archive.
    Normalize(NormalizeArgs),
    /// Filter and rewrite a manifest with a custom query.
    Query(QueryArgs),
}

#[derive(Debug, Args)]
pub struct CopyArgs {
    /// Directory the archive lives in.
    pub archive_root: PathBuf,
    /// Query name; only shapes the archive layout with `--customquery`.
    pub query: String,
    /// Only process lines captured by this cache. Pass "" to process every
    /// line under its own cache name.
    pub cache: String,
    /// Directory searched recursively for `{HASH}_DAT*` payloads.
    pub search_root: PathBuf,
    /// Pipe-delimited manifest (`HASH|URL|DATE|CACHE`).
    pub manifest: PathBuf,
    /// Media probe executable, as a path or a name on PATH.
    pub probe: PathBuf,
    /// Log of payloads that were already archived.
    pub dupes_log: PathBuf,
    /// Log of manifest lines without any payload.
    pub no_file_log: PathBuf,
    /// Date log enabling date-versioned placement of CDN files.
    pub cdn_log: Option<PathBuf>,
    /// Date log enabling date-ordered placement of `.odc` and `.sdc` files.
    pub dc_log: Option<PathBuf>,
    /// Hashes always archived as modified, one per line.
    pub modified_exceptions: Option<PathBuf>,
    /// Hashes always archived as corrupt, one per line. Wins over the
    /// modified list.
    pub corrupt_exceptions: Option<PathBuf>,

    /// Archive under `<archive dir>/<query>/<cache>` instead of `<archive dir>`.
    #[arg(long)]
    pub customquery: bool,
    /// Always target the main slot instead of allocating numbered duplicates.
    #[arg(long)]
    pub skipincrcopy: bool,
    /// Dry run: report what would be copied without touching the archive.
    #[arg(long)]
    pub verbose: bool,
    /// Write detailed tracing to `log_DEBUG.log` in the archive directory.
    #[arg(long)]
    pub debug: bool,
    /// Record every main-tree copy in LOG, and keep only the largest `.sdat`,
    /// `.bar` and `.png`.
    #[arg(long = "override", value_name = "LOG")]
    pub override_log: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Directory the archive lives in.
    pub archive_root: PathBuf,
    /// Report the renames without carrying them out.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Start-anchored, case-insensitive pattern selecting lines.
    pub search: String,
    /// Rewrite expression (`$txt=$1+literal+$2`); anything else keeps the
    /// whole match.
    pub replace: String,
    /// Lines to drop (`/pattern/i`, a bare pattern, or "" for none).
    pub blocklist: String,
    pub input: PathBuf,
    pub output: PathBuf,
}
