use crate::place::error::{ErrorKind, Result};
use crate::place::{ArchiveWriter, Category, Incoming, Outcome, SkipReason};
use exn::ResultExt;
use homecache_manifest::CaptureDate;
use homecache_storage::Slots;
use homecache_storage::sidelog::DateLog;

/// A single main slot holding the most recently captured version, with the
/// capture date of that version kept in `log`.
pub(super) fn place(writer: &mut ArchiveWriter<'_>, incoming: &Incoming<'_>, log: &DateLog) -> Result<Outcome> {
    let Some(date) = incoming.date else {
        tracing::debug!(logical = incoming.logical_str, raw_date = %incoming.entry.raw_date, "No capture date; skipping");
        return Ok(Outcome::Skipped(SkipReason::NoDate));
    };
    let main = Slots::of(incoming.logical).main();
    let record = log.lookup(incoming.logical_str).or_raise(|| ErrorKind::SideLog)?;
    // An unreadable recorded date never blocks a dated write.
    let newer = record.as_ref().is_none_or(|r| CaptureDate::from_log_form(&r.date).is_none_or(|previous| date > previous));

    match writer.existing(&main)? {
        Some(occupant) if incoming.identity().same_content(&occupant) => return writer.duplicate(incoming, &main),
        Some(_) if !newer => {
            tracing::debug!(logical = incoming.logical_str, date = %date, "Archived version is at least as recent; skipping");
            return Ok(Outcome::Skipped(SkipReason::NotNewer));
        },
        _ => {},
    }

    let stamp = date.log_form();
    let outcome = match (&record, newer) {
        (None, _) => {
            let outcome = writer.copy(incoming, &main, Category::DateCollision, "")?;
            log.record(incoming.logical_str, &stamp, false).or_raise(|| ErrorKind::SideLog)?;
            outcome
        },
        (Some(_), true) => {
            let outcome =
                writer.copy(incoming, &main, Category::DateCollision, &format!(" ( NEWER DATE {stamp} )"))?;
            log.record(incoming.logical_str, &stamp, true).or_raise(|| ErrorKind::SideLog)?;
            outcome
        },
        // Main slot went missing; restore it without rewinding the log.
        (Some(_), false) => writer.copy(incoming, &main, Category::DateCollision, "")?,
    };
    Ok(outcome)
}
