use crate::place::error::{ErrorKind, Result};
use crate::place::{Category, Incoming, Outcome};
use crate::run::{RunEvent, StatusLine};
use crate::{Context, Counters};
use exn::ResultExt;
use homecache_fingerprint::Identity;
use std::path::Path;

/// Carries out placement decisions: copies, demotions and duplicate records,
/// keeping the run's counters and announcing every copy.
pub(crate) struct ArchiveWriter<'a> {
    context: &'a Context,
    counters: &'a mut Counters,
    events: &'a mut dyn FnMut(&RunEvent),
}
impl<'a> ArchiveWriter<'a> {
    pub fn new(context: &'a Context, counters: &'a mut Counters, events: &'a mut dyn FnMut(&RunEvent)) -> Self {
        Self { context, counters, events }
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    pub fn skip_incremental(&self) -> bool {
        self.context.options.skip_incremental
    }

    /// Size and hash of whatever occupies `slot`, if anything.
    ///
    /// A slot taken by a directory (or anything else that is not a regular
    /// file) is raised as [`ErrorKind::NotAFile`]; it is never hashed,
    /// replaced or moved aside.
    pub fn existing(&self, slot: &Path) -> Result<Option<Identity>> {
        let backend = &self.context.backend;
        if !backend.exists(slot).or_raise(|| ErrorKind::Storage)? {
            return Ok(None);
        }
        let location = backend.locate(slot).or_raise(|| ErrorKind::Storage)?;
        if !location.is_file() {
            exn::bail!(ErrorKind::NotAFile(slot.to_path_buf()));
        }
        Ok(Some(Identity::of(location)))
    }

    /// Copies the incoming payload to `slot`, replacing any occupant.
    ///
    /// The status line reads `{cache}/{slot}{note}`.
    pub fn copy(&mut self, incoming: &Incoming<'_>, slot: &Path, category: Category, note: &str) -> Result<Outcome> {
        self.context.backend.import(incoming.source, slot).or_raise(|| ErrorKind::Storage)?;

        self.counters.copied += 1;
        match category {
            Category::Corrupt => self.counters.corrupt += 1,
            Category::Modified => self.counters.modified += 1,
            _ => {},
        }
        let status = StatusLine {
            number: self.counters.copied,
            message: format!("{}/{}{note}", incoming.cache, slash(slot)),
            dry_run: self.context.is_dry_run(),
        };
        tracing::debug!(cache = incoming.cache, %category, "{status}");
        (self.events)(&RunEvent::Copied(status));

        if category.is_main_tree()
            && let Some(log) = &self.context.capabilities.new_files_log
        {
            log.append(&incoming.entry.override_line(incoming.logical_str)).or_raise(|| ErrorKind::SideLog)?;
        }
        Ok(Outcome::Copied { slot: slot.to_path_buf(), category })
    }

    /// Moves an archived file aside. The destination must be free.
    pub fn demote(&self, from: &Path, to: &Path) -> Result<()> {
        tracing::debug!(from = %from.display(), to = %to.display(), "Demoting archived file");
        self.context.backend.rename(from, to).or_raise(|| ErrorKind::Storage)
    }

    /// Records that the incoming payload is already archived at `slot`.
    pub fn duplicate(&mut self, incoming: &Incoming<'_>, slot: &Path) -> Result<Outcome> {
        let source = self.context.layout.display_source(incoming.source);
        self.context
            .reports
            .dupes
            .append_record(&[incoming.cache, &source, incoming.logical_str])
            .or_raise(|| ErrorKind::SideLog)?;
        self.counters.dupes += 1;
        tracing::debug!(cache = incoming.cache, %source, slot = %slot.display(), "Already archived");
        Ok(Outcome::Duplicate { slot: slot.to_path_buf() })
    }
}

/// Archive paths always use forward slashes in status lines and logs.
pub(crate) fn slash(path: &Path) -> String {
    path.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}
