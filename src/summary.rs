use homecache_library::Counters;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const TIMESTAMP: &[BorrowedFormatItem<'_>] = format_description!("[month]/[day]/[year] [hour]:[minute]:[second]");
const RULE: &str = "=======================================================";

/// Local wall-clock time, or UTC when the local offset is unknown.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `1.23s`, `4m 5.00s` or `1h 2m 3.00s`.
pub fn format_duration(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    if total < 60.0 {
        return format!("{total:.2}s");
    }
    let seconds = total % 60.0;
    let minutes = elapsed.as_secs() / 60;
    if total < 3600.0 {
        return format!("{minutes}m {seconds:.2}s");
    }
    format!("{}h {}m {seconds:.2}s", minutes / 60, minutes % 60)
}

/// End-of-run report.
#[derive(Debug, Clone)]
pub struct Summary {
    pub started: OffsetDateTime,
    pub ended: OffsetDateTime,
    pub elapsed: Duration,
    pub counters: Counters,
}
impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let stamp = |at: &OffsetDateTime| at.format(TIMESTAMP).unwrap_or_default();
        let counters = &self.counters;
        writeln!(f)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Cache Copy started at :          | {}", stamp(&self.started))?;
        writeln!(f, "Cache Copy ended at :            | {}", stamp(&self.ended))?;
        writeln!(f, "Duration :                       | {}", format_duration(self.elapsed))?;
        writeln!(f, "Total files copied :             | {}", counters.copied)?;
        writeln!(f, "Total corrupt files copied :     | {}", counters.corrupt)?;
        writeln!(f, "Total modified files copied :    | {}", counters.modified)?;
        writeln!(f, "Total dupes :                    | {}", counters.dupes)?;
        writeln!(f, "Total INF w/ multi DAT matches : | {}", counters.multi_match)?;
        writeln!(f, "{RULE}")
    }
}
