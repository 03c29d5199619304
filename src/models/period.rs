//! Period key representation
//!
//! A period is a calendar month, written `YYYY-MM`. Expenses are bucketed by
//! period for monthly balances and reports.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar-month period identifier (e.g., "2025-01")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

/// Inclusive UTC interval covered by a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodBoundaries {
    /// 00:00:00.000 UTC on the first day of the month
    pub start: DateTime<Utc>,
    /// 23:59:59.999 UTC on the last day of the month
    pub end: DateTime<Utc>,
}

impl PeriodBoundaries {
    /// Check if an instant falls within the period (both ends inclusive)
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        let instant = instant.with_timezone(&Utc);
        instant >= self.start && instant <= self.end
    }
}

impl PeriodKey {
    /// Create a period key, returning `None` for a month outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && NaiveDate::from_ymd_opt(year, month, 1).is_some() {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Get the period containing a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Get the current period in the local time zone
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// The year of this period
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of this period (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Get the first day of this period
    pub fn start_date(&self) -> NaiveDate {
        // Constructed through `new`, so day 1 always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Get the last day of this period (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    /// Number of days in this period
    pub fn days(&self) -> u32 {
        self.end_date().day()
    }

    /// Get the first and last instants of this period in UTC
    pub fn boundaries(&self) -> PeriodBoundaries {
        let start = self.start_date().and_time(NaiveTime::MIN).and_utc();
        let end = self
            .end_date()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or_default()
            .and_utc();
        PeriodBoundaries { start, end }
    }

    /// Check if a calendar date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Get the next period
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Get the previous period
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Parse a period string in `YYYY-MM` form
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();

        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodParseError::InvalidFormat(s.to_string()))?;

        if year.len() != 4 || month.len() != 2 {
            return Err(PeriodParseError::InvalidFormat(s.to_string()));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month).ok_or(PeriodParseError::InvalidMonth(month))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PeriodKey {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = PeriodParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => {
                write!(f, "Invalid period format: {} (expected YYYY-MM)", s)
            }
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: i32, month: u32) -> PeriodKey {
        PeriodKey::new(year, month).unwrap()
    }

    #[test]
    fn test_month_dates() {
        let period = key(2025, 1);
        assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    }

    #[test]
    fn test_month_lengths() {
        let expected = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (i, days) in expected.iter().enumerate() {
            assert_eq!(key(2023, i as u32 + 1).days(), *days, "month {}", i + 1);
        }
        assert_eq!(key(2024, 2).days(), 29);
        assert_eq!(key(2000, 2).days(), 29);
        assert_eq!(key(1900, 2).days(), 28);
    }

    #[test]
    fn test_navigation() {
        assert_eq!(key(2025, 1).next(), key(2025, 2));
        assert_eq!(key(2024, 12).next(), key(2025, 1));
        assert_eq!(key(2025, 1).prev(), key(2024, 12));
    }

    #[test]
    fn test_boundaries_leap_february() {
        let bounds = key(2024, 2).boundaries();
        assert_eq!(bounds.start.to_rfc3339(), "2024-02-01T00:00:00+00:00");
        assert_eq!(
            bounds.end.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            "2024-02-29T23:59:59.999Z"
        );
    }

    #[test]
    fn test_boundaries_contains_edges() {
        let bounds = key(2025, 3).boundaries();
        let first = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        assert!(bounds.contains(&first));
        assert!(bounds.contains(&last));
        assert!(!bounds.contains(&after));
    }

    #[test]
    fn test_parse() {
        assert_eq!(PeriodKey::parse("2025-01").unwrap(), key(2025, 1));
        assert_eq!(PeriodKey::parse(" 2025-12 ").unwrap(), key(2025, 12));
        assert_eq!(
            PeriodKey::parse("2025-13"),
            Err(PeriodParseError::InvalidMonth(13))
        );
        assert!(PeriodKey::parse("2025-1").is_err());
        assert!(PeriodKey::parse("2025-W03").is_err());
        assert!(PeriodKey::parse("january").is_err());
    }

    #[test]
    fn test_display_and_ordering() {
        assert_eq!(key(2025, 1).to_string(), "2025-01");
        assert!(key(2024, 12) < key(2025, 1));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&key(2025, 1)).unwrap();
        assert_eq!(json, r#""2025-01""#);
        let back: PeriodKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key(2025, 1));
        assert!(serde_json::from_str::<PeriodKey>(r#""2025-00""#).is_err());
    }
}
