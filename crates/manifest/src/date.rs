use std::fmt::{Display, Formatter, Result as FmtResult};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const MANIFEST_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[day][month repr:short][year]");
const SLOT_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const LOG_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year][month][day]");

/// The day a manifest entry was captured.
///
/// Manifests write it as `05Jan2012` (or the literal `null`). The archive uses
/// `2012-01-05` in slot names and `20120105` in date logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureDate(Date);
impl CaptureDate {
    /// Parses the manifest form. `null`, empty and unparsable values are
    /// `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
            return None;
        }
        Date::parse(raw, MANIFEST_FORMAT)
            .inspect_err(|e| tracing::debug!(raw, error = %e, "Unparsable capture date"))
            .ok()
            .map(Self)
    }

    /// Parses the form written to date logs.
    pub fn from_log_form(raw: &str) -> Option<Self> {
        Date::parse(raw.trim(), LOG_FORMAT).ok().map(Self)
    }

    /// `YYYY-MM-DD`
    pub fn slot_form(&self) -> String {
        self.0.format(SLOT_FORMAT).unwrap_or_default()
    }

    /// `YYYYMMDD`
    pub fn log_form(&self) -> String {
        self.0.format(LOG_FORMAT).unwrap_or_default()
    }
}
impl Display for CaptureDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.slot_form())
    }
}
