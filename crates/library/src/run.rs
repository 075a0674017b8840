use crate::error::{ErrorKind, Result};
use crate::place::{self, ArchiveWriter, Incoming, Outcome};
use crate::{Context, Counters};
use derive_more::Display;
use exn::ResultExt;
use homecache_fingerprint::{VideoReport, sniff};
use homecache_manifest::{ManifestEntry, resolve};
use std::path::Path;
use tracing::instrument;

const VIDEO_BENIGN_NOTE: &str = "Only error found is 'missing picture in access unit with size 5'. Skipping...";
const VIDEO_SEPARATOR: &str = "-----------------------------------------------";

/// One copy, as announced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{}COPIED {number} {message}", if *dry_run { "[VERBOSE] " } else { "" })]
pub struct StatusLine {
    /// Running copy count, starting at 1.
    pub number: u64,
    pub message: String,
    /// The copy was only rehearsed.
    pub dry_run: bool,
}

/// Progress events emitted by [`run`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): once, before the first matching line, and
///    only if there is one.
/// 2. [`Copied`](Self::Copied): zero or more times, one per copy.
/// 3. [`Complete`](Self::Complete): exactly once, with the final counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Started,
    Copied(StatusLine),
    Complete(Counters),
}

/// Processes every manifest line that passes the cache filter.
///
/// Lines that are not manifest records are ignored. Failures while placing a
/// candidate are logged and the run carries on.
pub fn run(ctx: &Context, lines: &[String], mut on_event: impl FnMut(&RunEvent)) -> Counters {
    let mut counters = Counters::default();
    let filter = ctx.options.cache.as_deref().map(str::trim).filter(|c| !c.is_empty());

    for line in lines {
        let Ok(entry) = ManifestEntry::parse(line) else {
            continue;
        };
        if filter.is_some_and(|cache| !entry.belongs_to(cache)) {
            continue;
        }
        if counters.lines == 0 {
            on_event(&RunEvent::Started);
        }
        counters.lines += 1;
        process_entry(ctx, &entry, &mut counters, &mut on_event);
    }

    on_event(&RunEvent::Complete(counters));
    counters
}

/// Archives every candidate payload for one manifest record.
///
/// Returns one outcome per candidate, in path order. A record without
/// candidates is written to the no-file log and has no outcomes.
#[instrument(level = "debug", skip_all, fields(cache = %entry.cache, hash = %entry.hash))]
pub fn process_entry(
    ctx: &Context,
    entry: &ManifestEntry,
    counters: &mut Counters,
    on_event: &mut dyn FnMut(&RunEvent),
) -> Vec<Outcome> {
    let cache = ctx.options.cache.as_deref().map(str::trim).filter(|c| !c.is_empty()).unwrap_or(entry.cache.as_str());
    let mut resolved = resolve(&entry.url);
    let date = entry.capture_date();

    let candidates = ctx.index.candidates(&entry.hash);
    if candidates.len() > 1 {
        counters.multi_match += 1;
    }
    if candidates.is_empty() {
        tracing::debug!(logical = %resolved.logical, "No cached payload for manifest entry");
        let key = format!("{}_INF", entry.hash);
        if let Err(e) = ctx.reports.no_file.append_record(&[cache, &key, &resolved.logical]) {
            tracing::warn!(error = ?e, "Unable to write no-file log");
        }
        return Vec::new();
    }

    let mut outcomes = Vec::with_capacity(candidates.len());
    for source in candidates {
        if source.extension().is_none()
            && let Some(sniffed) = sniff(source)
            && resolved.append_extension(sniffed.extension())
        {
            tracing::debug!(source = %source.display(), logical = %resolved.logical, "Added sniffed extension");
        }
        let logical = match resolved.path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(url = %entry.url, error = ?e, "Skipping manifest entry with an unusable path");
                outcomes.push(Outcome::Failed);
                continue;
            },
        };
        let extension = resolved.extension();
        let (fingerprint, report) = ctx.fingerprinter.fingerprint(source, &extension);
        if let Some(report) = report
            && let Err(e) = record_video(ctx, &resolved.url, source, &report)
        {
            tracing::warn!(error = ?e, "Unable to write video analysis log");
        }

        let category = place::classify(&fingerprint, &extension, &ctx.capabilities);
        let incoming = Incoming {
            entry,
            cache,
            source,
            logical: &logical,
            logical_str: &resolved.logical,
            extension: &extension,
            fingerprint: &fingerprint,
            date,
        };
        let mut writer = ArchiveWriter::new(ctx, counters, on_event);
        let outcome = match place::place(&mut writer, &incoming, category) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(source = %source.display(), logical = %resolved.logical, %category, error = ?e, "Unable to place candidate");
                Outcome::Failed
            },
        };
        tracing::debug!(source = %source.display(), %category, ?outcome, "Placed candidate");
        outcomes.push(outcome);
    }
    outcomes
}

fn record_video(ctx: &Context, url: &str, source: &Path, report: &VideoReport) -> Result<()> {
    let log = &ctx.reports.video;
    let mut lines = vec![url.to_string(), format!("{}:", ctx.layout.display_source(source))];
    if report.is_benign_only() {
        lines.push(VIDEO_BENIGN_NOTE.to_string());
    } else {
        lines.extend(report.lines.iter().cloned());
    }
    lines.push(VIDEO_SEPARATOR.to_string());
    for line in lines {
        log.append(&line).or_raise(|| ErrorKind::SideLog)?;
    }
    Ok(())
}
