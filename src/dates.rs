//! Capture timestamps on the gallery side.
//!
//! Manifest dates are strings. The indexer always writes RFC 3339 UTC, but
//! hand-edited manifests turn up with looser forms, so parsing tries, in order:
//!
//! - RFC 3339 (`2025-04-12T07:09:59Z`, `2025-04-12T09:09:59+02:00`)
//! - a naive date-time (`2025-04-12T07:09:59`), read as UTC
//! - a bare date (`2025-04-12`), read as midnight UTC
//!
//! Anything else is an invalid date: the record stays in the gallery but falls
//! into the [`GroupKey::Unknown`] bucket and shows its raw string.
//!
//! All calendar math uses UTC components so that a satellite pass at
//! 23:50 UTC lands in the same month for every viewer.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::fmt;
use std::str::FromStr;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Label shown for the bucket of records without a parseable date.
pub const UNKNOWN_DATE_LABEL: &str = "Unknown Date";

/// Parse a manifest date string into a UTC timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Card date: `YYYY/MM/DD HH:MM UTC`, or the raw string when unparseable.
pub fn format_card_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => format!(
            "{:04}/{:02}/{:02} {:02}:{:02} UTC",
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute()
        ),
        None => raw.to_string(),
    }
}

/// A calendar month in UTC, the unit of grouping and of the date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Month of a raw manifest date, `None` when the date is invalid.
    pub fn of(raw: &str) -> Option<Self> {
        parse_timestamp(raw).map(|dt| Self::new(dt.year(), dt.month()))
    }

    /// `year * 100 + month`; larger is newer.
    pub fn sort_key(&self) -> i64 {
        i64::from(self.year) * 100 + i64::from(self.month)
    }

    /// Display label, e.g. `April 2025`.
    pub fn label(&self) -> String {
        let name = self
            .month
            .checked_sub(1)
            .and_then(|i| MONTH_NAMES.get(i as usize))
            .copied()
            .unwrap_or("?");
        format!("{} {}", name, self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    /// Accepts `YYYY-MM` and `YYYY-M`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got '{s}'"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in '{s}'"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in '{s}'"))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range in '{s}'"));
        }
        Ok(Self::new(year, month))
    }
}

/// Grouping bucket: a real month, or the catch-all for invalid dates.
///
/// Carried through rendering so the batch-boundary merge compares keys
/// rather than header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Month(MonthKey),
    Unknown,
}

impl GroupKey {
    pub fn of(raw: &str) -> Self {
        MonthKey::of(raw).map(GroupKey::Month).unwrap_or(GroupKey::Unknown)
    }

    /// Unknown sorts as 0, after every real month.
    pub fn sort_key(&self) -> i64 {
        match self {
            GroupKey::Month(m) => m.sort_key(),
            GroupKey::Unknown => 0,
        }
    }

    pub fn label(&self) -> String {
        match self {
            GroupKey::Month(m) => m.label(),
            GroupKey::Unknown => UNKNOWN_DATE_LABEL.to_string(),
        }
    }
}
