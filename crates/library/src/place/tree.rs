use crate::place::error::Result;
use crate::place::{ArchiveWriter, Category, Incoming, Outcome, SkipReason};
use homecache_storage::Tree;

/// `corrupted/<path>` keeps the most complete sample seen: a different sample
/// only replaces it when strictly larger.
pub(super) fn place_corrupt(writer: &mut ArchiveWriter<'_>, incoming: &Incoming<'_>) -> Result<Outcome> {
    let slot = writer.context().layout.in_tree(Tree::Corrupted, incoming.logical);
    let identity = incoming.identity();
    match writer.existing(&slot)? {
        Some(occupant) if identity.same_content(&occupant) => writer.duplicate(incoming, &slot),
        Some(occupant) if identity.larger_than(&occupant) => {
            writer.copy(incoming, &slot, Category::Corrupt, " - CORRUPT ( NEW FILE SIZE )")
        },
        Some(_) => Ok(Outcome::Skipped(SkipReason::NotLarger)),
        None => writer.copy(incoming, &slot, Category::Corrupt, " - CORRUPT"),
    }
}

/// `modified/<path>` holds the latest different content seen.
pub(super) fn place_modified(writer: &mut ArchiveWriter<'_>, incoming: &Incoming<'_>) -> Result<Outcome> {
    let slot = writer.context().layout.in_tree(Tree::Modified, incoming.logical);
    match writer.existing(&slot)? {
        Some(occupant) if incoming.identity().same_content(&occupant) => writer.duplicate(incoming, &slot),
        _ => writer.copy(incoming, &slot, Category::Modified, " - MODIFIED"),
    }
}
