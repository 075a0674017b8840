//! Plain-text side logs written next to the archive.
//!
//! All logs are UTF-8, one record per newline-terminated line, fields
//! separated by tabs. [`AppendLog`]s only ever grow; a [`DateLog`] keeps a
//! single line per logical path and is rewritten whole when one changes.

use crate::error::{ErrorKind, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ErrorKind::from_io(e, parent))?;
    }
    Ok(())
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => exn::bail!(ErrorKind::from_io(e, path)),
    }
}

/// Replaces the content of `path` with `lines`, so that readers see either
/// the old or the new file and never a mix.
fn rewrite(path: &Path, lines: &[String]) -> Result<()> {
    ensure_parent(path)?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| ErrorKind::from_io(e, path))?;
    for line in lines {
        writeln!(staged, "{line}").map_err(|e| ErrorKind::from_io(e, path))?;
    }
    staged.persist(path).map_err(|e| ErrorKind::from_io(e.error, path))?;
    Ok(())
}

/// An append-only log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendLog {
    path: PathBuf,
}
impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one raw line.
    pub fn append(&self, line: &str) -> Result<()> {
        ensure_parent(&self.path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ErrorKind::from_io(e, &self.path))?;
        writeln!(file, "{line}").map_err(|e| ErrorKind::from_io(e, &self.path))?;
        Ok(())
    }

    /// Appends one tab-separated record.
    pub fn append_record(&self, fields: &[&str]) -> Result<()> {
        self.append(&fields.join("\t"))
    }
}

/// The last date recorded for a logical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRecord {
    /// `YYYYMMDD`, or empty for an undated first write.
    pub date: String,
    /// Set when the entry replaced an older one (the trailing `x` flag).
    pub superseded: bool,
}

/// A `logical_path\tdate[\tx]` log with exactly one line per logical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLog {
    path: PathBuf,
    read_only: bool,
}
impl DateLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), read_only: false }
    }

    /// Lookups still work; [`record`](Self::record) becomes a no-op.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lookup(&self, logical: &str) -> Result<Option<DateRecord>> {
        for line in read_lines(&self.path)? {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() >= 2 && fields[0] == logical {
                return Ok(Some(DateRecord {
                    date: fields[1].to_string(),
                    superseded: fields.get(2).is_some_and(|f| f.eq_ignore_ascii_case("x")),
                }));
            }
        }
        Ok(None)
    }

    /// Sets the date for `logical`, replacing its existing line in place or
    /// appending a new one.
    pub fn record(&self, logical: &str, date: &str, superseded: bool) -> Result<()> {
        let entry = match superseded {
            true => format!("{logical}\t{date}\tx"),
            false => format!("{logical}\t{date}"),
        };
        if self.read_only {
            tracing::info!(log = %self.path.display(), entry = %entry, "Skipping date log update during dry run");
            return Ok(());
        }
        let prefix = format!("{logical}\t");
        let mut found = false;
        let mut lines = read_lines(&self.path)?;
        for line in lines.iter_mut().filter(|l| l.starts_with(&prefix)) {
            *line = entry.clone();
            found = true;
        }
        if !found {
            lines.push(entry);
        }
        rewrite(&self.path, &lines)
    }
}

/// Sorts a dupes log by target path, then source path, ignoring case.
///
/// Lines that are not three tab-separated fields are kept, in their original
/// order, after the sorted block. A missing log is left alone.
pub fn sort_dupes(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.try_exists().map_err(ErrorKind::Io)? {
        return Ok(());
    }
    let mut records = Vec::new();
    let mut malformed = Vec::new();
    for line in read_lines(path)? {
        let fields: Vec<&str> = line.split('\t').collect();
        match fields.as_slice() {
            [_, source, target] => records.push((target.to_lowercase(), source.to_lowercase(), line.clone())),
            _ if line.trim().is_empty() => {},
            _ => malformed.push(line.clone()),
        }
    }
    records.sort();
    if !malformed.is_empty() {
        tracing::warn!(log = %path.display(), lines = malformed.len(), "Dupes log has malformed lines; kept unsorted");
    }
    let lines: Vec<String> = records.into_iter().map(|(_, _, line)| line).chain(malformed).collect();
    rewrite(path, &lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let log = AppendLog::new(tmp.path().join("logs/dupes.log"));
        log.append_record(&["cache", "CACHE/A_DAT", "a/b.xml"]).unwrap();
        log.append_record(&["cache", "CACHE/B_DAT", "a/c.xml"]).unwrap();
        assert_eq!(
            fs::read_to_string(log.path()).unwrap(),
            "cache\tCACHE/A_DAT\ta/b.xml\ncache\tCACHE/B_DAT\ta/c.xml\n"
        );
    }

    #[test]
    fn test_date_log_single_line_per_path() {
        let tmp = tempfile::tempdir().unwrap();
        let log = DateLog::new(tmp.path().join("cdn.log"));
        assert_eq!(log.lookup("a/b.xml").unwrap(), None);

        log.record("a/b.xml", "20120105", false).unwrap();
        log.record("a/c.xml", "", false).unwrap();
        log.record("a/b.xml", "20130101", true).unwrap();

        assert_eq!(
            fs::read_to_string(log.path()).unwrap(),
            "a/b.xml\t20130101\tx\na/c.xml\t\n"
        );
        assert_eq!(
            log.lookup("a/b.xml").unwrap(),
            Some(DateRecord { date: "20130101".to_string(), superseded: true })
        );
        assert_eq!(log.lookup("a/c.xml").unwrap(), Some(DateRecord { date: String::new(), superseded: false }));
        // Prefixes of other paths do not match.
        assert_eq!(log.lookup("a/b").unwrap(), None);
    }

    #[test]
    fn test_read_only_date_log() {
        let tmp = tempfile::tempdir().unwrap();
        let log = DateLog::new(tmp.path().join("dc.log")).read_only(true);
        log.record("a.odc", "20120105", false).unwrap();
        assert!(!log.path().exists());
    }

    #[test]
    fn test_sort_dupes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dupes.log");
        fs::write(
            &path,
            "c\tCACHE/Z_DAT\tb/B.xml\nbroken line\nc\tCACHE/b_DAT\ta/x.xml\nc\tCACHE/A_DAT\ta/X.xml\n\n",
        )
        .unwrap();
        sort_dupes(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "c\tCACHE/A_DAT\ta/X.xml\nc\tCACHE/b_DAT\ta/x.xml\nc\tCACHE/Z_DAT\tb/B.xml\nbroken line\n"
        );
        // Missing logs are fine.
        sort_dupes(tmp.path().join("missing.log")).unwrap();
    }
}
