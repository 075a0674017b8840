use crate::place::error::{ErrorKind, Result};
use crate::place::{ArchiveWriter, Category, Incoming, MAX_NUMBERED_SLOTS, Outcome, first_free, scan_family};
use homecache_storage::Slots;

/// Main slot plus `-1` to `-99` variants. The largest version seen holds the
/// main slot; smaller distinct versions fill the first free variant.
pub(super) fn place(writer: &mut ArchiveWriter<'_>, incoming: &Incoming<'_>) -> Result<Outcome> {
    let slots = Slots::of(incoming.logical);
    let main = slots.main();
    let identity = incoming.identity();
    let numbered = || (1..MAX_NUMBERED_SLOTS).map(|n| slots.numbered(n));

    let Some(occupant) = writer.existing(&main)? else {
        return writer.copy(incoming, &main, Category::Numbered, "");
    };
    if identity.same_content(&occupant) {
        return writer.duplicate(incoming, &main);
    }
    if writer.skip_incremental() {
        return writer.copy(incoming, &main, Category::Numbered, "");
    }
    if identity.larger_than(&occupant) {
        let demoted = first_free(writer, numbered(), &main)?;
        writer.demote(&main, &demoted)?;
        return writer.copy(incoming, &main, Category::Numbered, " - UNIQUE DUPE ( NEW FILE SIZE )");
    }
    let scan = scan_family(writer, numbered(), Some(&identity))?;
    match (scan.duplicate, scan.free) {
        (Some(slot), _) => writer.duplicate(incoming, &slot),
        (None, Some(slot)) => writer.copy(incoming, &slot, Category::Numbered, " - UNIQUE DUPE"),
        (None, None) => exn::bail!(ErrorKind::SlotsExhausted(main)),
    }
}
