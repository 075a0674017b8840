use crate::place::error::Result;
use crate::place::{ArchiveWriter, Category, Incoming, Outcome, SkipReason};
use homecache_storage::Slots;

/// A single main slot that only ever grows.
pub(super) fn place(writer: &mut ArchiveWriter<'_>, incoming: &Incoming<'_>) -> Result<Outcome> {
    let main = Slots::of(incoming.logical).main();
    let identity = incoming.identity();
    let extension = format!(".{}", incoming.extension);
    match writer.existing(&main)? {
        Some(occupant) if identity.same_content(&occupant) => writer.duplicate(incoming, &main),
        Some(occupant) if identity.larger_than(&occupant) => {
            writer.copy(incoming, &main, Category::SizeWins, &format!(" - {extension} ( NEW FILE SIZE )"))
        },
        Some(_) => {
            tracing::debug!(logical = incoming.logical_str, "Archived version is at least as large; skipping");
            Ok(Outcome::Skipped(SkipReason::NotLarger))
        },
        None => writer.copy(incoming, &main, Category::SizeWins, &format!(" - {extension}")),
    }
}
