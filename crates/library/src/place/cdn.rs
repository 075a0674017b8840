//! Date-versioned placement for files the CDN republishes under the same URL.
//!
//! For `dir/name.xml` the family looks like:
//!
//! - `name.xml`: the newest dated version (or the first undated one).
//! - `name-N.xml`: other undated versions, and undated mains pushed aside by
//!   the first dated write.
//! - `name_YYYY-MM-DD.xml` and `name_YYYY-MM-DD-N.xml`: versions captured on
//!   that day that are not (or no longer) the newest.
//!
//! The date log records the capture date of whatever holds the main slot.

use crate::place::error::{ErrorKind, Result};
use crate::place::{ArchiveWriter, Category, Incoming, MAX_CDN_SLOTS, Outcome, first_free, scan_family};
use exn::{OptionExt, ResultExt};
use homecache_manifest::CaptureDate;
use homecache_storage::Slots;
use homecache_storage::sidelog::DateLog;
use std::iter;
use std::path::{Path, PathBuf};

const UNIQUE_DUPE: &str = "  ( UNIQUE DUPE )";

fn undated(slots: &Slots) -> impl Iterator<Item = PathBuf> + '_ {
    (1..MAX_CDN_SLOTS).map(|n| slots.numbered(n))
}

fn dated(slots: &Slots, date: CaptureDate) -> impl Iterator<Item = PathBuf> + '_ {
    let day = date.slot_form();
    iter::once(slots.dated(&day)).chain((1..MAX_CDN_SLOTS).map(move |n| slots.dated_numbered(&day, n)))
}

pub(super) fn place(writer: &mut ArchiveWriter<'_>, incoming: &Incoming<'_>, log: &DateLog) -> Result<Outcome> {
    let slots = Slots::of(incoming.logical);
    let main = slots.main();
    let identity = incoming.identity();

    if let Some(occupant) = writer.existing(&main)?
        && identity.same_content(&occupant)
    {
        return writer.duplicate(incoming, &main);
    }
    let undated_scan = scan_family(writer, undated(&slots), Some(&identity))?;
    if let Some(slot) = undated_scan.duplicate {
        return writer.duplicate(incoming, &slot);
    }
    let dated_scan = match incoming.date {
        Some(date) => Some(scan_family(writer, dated(&slots, date), Some(&identity))?),
        None => None,
    };
    if let Some(slot) = dated_scan.as_ref().and_then(|s| s.duplicate.clone()) {
        return writer.duplicate(incoming, &slot);
    }

    let record = log.lookup(incoming.logical_str).or_raise(|| ErrorKind::SideLog)?;
    let main_exists = writer.existing(&main)?.is_some();

    let Some(date) = incoming.date else {
        if !main_exists {
            let outcome = writer.copy(incoming, &main, Category::CdnVersioned, "")?;
            if record.is_none() {
                log.record(incoming.logical_str, "", false).or_raise(|| ErrorKind::SideLog)?;
            }
            return Ok(outcome);
        }
        let slot = undated_scan.free.ok_or_raise(|| ErrorKind::SlotsExhausted(main.clone()))?;
        return writer.copy(incoming, &slot, Category::CdnVersioned, UNIQUE_DUPE);
    };

    let stamp = date.log_form();
    let previous = record.as_ref().map(|r| CaptureDate::from_log_form(&r.date));
    match previous {
        // First dated write. An undated main moves to the undated family.
        None => {
            if main_exists {
                let demoted = first_free(writer, undated(&slots), &main)?;
                writer.demote(&main, &demoted)?;
            }
            let outcome = writer.copy(incoming, &main, Category::CdnVersioned, "")?;
            log.record(incoming.logical_str, &stamp, false).or_raise(|| ErrorKind::SideLog)?;
            Ok(outcome)
        },
        // The main slot is undated (or its date is unreadable): same, but superseding.
        Some(None) => {
            if main_exists {
                let demoted = first_free(writer, undated(&slots), &main)?;
                writer.demote(&main, &demoted)?;
            }
            promote(writer, incoming, log, &main, &stamp)
        },
        Some(Some(previous)) if date > previous => {
            if main_exists {
                let demoted = first_free(writer, dated(&slots, previous), &main)?;
                writer.demote(&main, &demoted)?;
            }
            promote(writer, incoming, log, &main, &stamp)
        },
        // Not newer: file it under its own date, never promoted.
        Some(Some(_)) => {
            let slot = dated_scan
                .and_then(|s| s.free)
                .ok_or_raise(|| ErrorKind::SlotsExhausted(slots.dated(&date.slot_form())))?;
            writer.copy(incoming, &slot, Category::CdnVersioned, UNIQUE_DUPE)
        },
    }
}

fn promote(
    writer: &mut ArchiveWriter<'_>,
    incoming: &Incoming<'_>,
    log: &DateLog,
    main: &Path,
    stamp: &str,
) -> Result<Outcome> {
    let note = format!(" ( UNIQUE DUPE WITH NEW DATE {stamp} )");
    let outcome = writer.copy(incoming, main, Category::CdnVersioned, &note)?;
    log.record(incoming.logical_str, stamp, true).or_raise(|| ErrorKind::SideLog)?;
    Ok(outcome)
}
