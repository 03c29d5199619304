//! Period keying
//!
//! Derives the `YYYY-MM` period key of a date-like value and the UTC interval
//! a period covers. Dates arrive in three shapes (a zoned instant, a bare
//! calendar date string, or an epoch timestamp from the document store);
//! [`DateLike`] makes the shape explicit and everything below works on a
//! single resolved calendar day.
//!
//! Every resolved date is pinned to 12:00 in its zone before it is stored or
//! keyed. For offsets above -12h and up to +12h (see
//! [`noon_stays_on_utc_day`]) that noon instant lies on the same UTC day, so
//! the UTC interval of the key always contains it. A `Native` instant built
//! in a zone outside that window (UTC+13, UTC+14, UTC-12) is still keyed by
//! its own calendar month; its noon instant falls on the neighbouring UTC day
//! and, on the first or last day of a month, outside the key's interval.
//! Zone-less dates are read in a caller-supplied zone that settings keep
//! inside the window.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SplitError, SplitResult};
use crate::models::{PeriodBoundaries, PeriodKey};

/// A date value in any of the shapes the system receives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DateLikeRepr", into = "DateLikeRepr")]
pub enum DateLike {
    /// An instant together with the zone it was constructed in
    Native(DateTime<FixedOffset>),
    /// A calendar date string, expected as `YYYY-MM-DD`
    IsoCalendarDate(String),
    /// Seconds and nanoseconds since the Unix epoch
    EpochTimestamp { seconds: i64, nanoseconds: u32 },
}

impl DateLike {
    /// A calendar date string
    pub fn iso(date: impl Into<String>) -> Self {
        Self::IsoCalendarDate(date.into())
    }

    /// A calendar day as a `YYYY-MM-DD` string
    pub fn day(date: NaiveDate) -> Self {
        Self::IsoCalendarDate(date.format("%Y-%m-%d").to_string())
    }

    /// An epoch timestamp
    pub fn epoch(seconds: i64, nanoseconds: u32) -> Self {
        Self::EpochTimestamp {
            seconds,
            nanoseconds,
        }
    }

    /// Resolve to a calendar day and the zone that day belongs to
    ///
    /// `zone` is only consulted for shapes that carry no zone of their own
    /// (calendar date strings and epoch timestamps).
    pub fn resolve(&self, zone: FixedOffset) -> SplitResult<(NaiveDate, FixedOffset)> {
        match self {
            Self::Native(instant) => Ok((instant.date_naive(), *instant.offset())),
            Self::IsoCalendarDate(text) => {
                if let Some(date) = parse_calendar_date(text) {
                    return Ok((date, zone));
                }
                // Full timestamps written as strings keep their own offset
                DateTime::parse_from_rfc3339(text.trim())
                    .map(|instant| (instant.date_naive(), *instant.offset()))
                    .map_err(|_| SplitError::UnparseableDate(text.clone()))
            }
            Self::EpochTimestamp {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds)
                .map(|utc| (utc.with_timezone(&zone).date_naive(), zone))
                .ok_or_else(|| SplitError::UnparseableDate(self.to_string())),
        }
    }

    /// Resolve and pin the time of day to noon in the resolved zone
    pub fn at_noon(&self, zone: FixedOffset) -> SplitResult<DateTime<FixedOffset>> {
        let (date, zone) = self.resolve(zone)?;
        noon_on(date, zone).ok_or_else(|| SplitError::UnparseableDate(self.to_string()))
    }
}

impl fmt::Display for DateLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(instant) => write!(f, "{}", instant.to_rfc3339()),
            Self::IsoCalendarDate(text) => f.write_str(text),
            Self::EpochTimestamp {
                seconds,
                nanoseconds,
            } => write!(f, "{{seconds: {}, nanoseconds: {}}}", seconds, nanoseconds),
        }
    }
}

impl From<NaiveDate> for DateLike {
    fn from(date: NaiveDate) -> Self {
        Self::day(date)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateLike {
    fn from(instant: DateTime<Tz>) -> Self {
        Self::Native(instant.fixed_offset())
    }
}

/// Wire shape of [`DateLike`]: a string or a `{seconds, nanoseconds}` object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DateLikeRepr {
    Timestamp {
        seconds: i64,
        #[serde(default)]
        nanoseconds: u32,
    },
    Text(String),
}

impl From<DateLikeRepr> for DateLike {
    fn from(repr: DateLikeRepr) -> Self {
        match repr {
            DateLikeRepr::Timestamp {
                seconds,
                nanoseconds,
            } => Self::EpochTimestamp {
                seconds,
                nanoseconds,
            },
            DateLikeRepr::Text(text) => {
                if parse_calendar_date(&text).is_some() {
                    Self::IsoCalendarDate(text)
                } else if let Ok(instant) = DateTime::parse_from_rfc3339(text.trim()) {
                    Self::Native(instant)
                } else {
                    Self::IsoCalendarDate(text)
                }
            }
        }
    }
}

impl From<DateLike> for DateLikeRepr {
    fn from(date: DateLike) -> Self {
        match date {
            DateLike::Native(instant) => Self::Text(instant.to_rfc3339()),
            DateLike::IsoCalendarDate(text) => Self::Text(text),
            DateLike::EpochTimestamp {
                seconds,
                nanoseconds,
            } => Self::Timestamp {
                seconds,
                nanoseconds,
            },
        }
    }
}

/// Outcome of a lenient period lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodLookup {
    /// The input resolved to a calendar day
    Resolved(PeriodKey),
    /// The input could not be read; `key` is the month of the supplied "today"
    FellBack { key: PeriodKey, input: String },
}

impl PeriodLookup {
    /// The period key, resolved or fallen back
    pub fn key(&self) -> PeriodKey {
        match self {
            Self::Resolved(key) | Self::FellBack { key, .. } => *key,
        }
    }

    /// Whether the current-month fallback was used
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FellBack { .. })
    }
}

/// Zone used when a date carries none: UTC
pub fn utc_zone() -> FixedOffset {
    Utc.fix()
}

/// Derive the period key, failing on unreadable input
pub fn try_period_key_of(date: &DateLike) -> SplitResult<PeriodKey> {
    try_period_key_of_in(date, utc_zone())
}

/// Derive the period key, reading zone-less timestamps in `zone`
pub fn try_period_key_of_in(date: &DateLike, zone: FixedOffset) -> SplitResult<PeriodKey> {
    let noon = date.at_noon(zone)?;
    Ok(PeriodKey::from_date(noon.date_naive()))
}

/// Derive the period key, falling back to the month of `today` on bad input
pub fn lookup_period_key(date: &DateLike, zone: FixedOffset, today: NaiveDate) -> PeriodLookup {
    match try_period_key_of_in(date, zone) {
        Ok(key) => PeriodLookup::Resolved(key),
        Err(_) => PeriodLookup::FellBack {
            key: PeriodKey::from_date(today),
            input: date.to_string(),
        },
    }
}

/// Derive the period key of a date-like value
///
/// Unreadable input never fails: it maps to the current local month. Use
/// [`lookup_period_key`] to observe whether that happened.
///
/// # Examples
/// ```
/// use splitit::ledger::{period_key_of, DateLike};
/// assert_eq!(period_key_of(&DateLike::iso("2024-02-29")).to_string(), "2024-02");
/// ```
pub fn period_key_of(date: &DateLike) -> PeriodKey {
    lookup_period_key(date, utc_zone(), chrono::Local::now().date_naive()).key()
}

/// First and last instants (UTC, inclusive) of a period
pub fn period_boundaries(key: &PeriodKey) -> PeriodBoundaries {
    key.boundaries()
}

/// Noon on `date` in `zone`
pub fn noon_on(date: NaiveDate, zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let noon = date.and_hms_opt(12, 0, 0)?;
    zone.from_local_datetime(&noon).single()
}

/// Whether noon in `zone` lies on the same UTC calendar day
///
/// True for offsets above -12:00 and up to +12:00.
pub fn noon_stays_on_utc_day(zone: FixedOffset) -> bool {
    let offset = zone.local_minus_utc();
    offset > -12 * 3600 && offset <= 12 * 3600
}

/// Strict `YYYY-MM-DD` with a real calendar day
fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    fn key(s: &str) -> PeriodKey {
        PeriodKey::parse(s).unwrap()
    }

    #[test]
    fn test_calendar_date_string() {
        assert_eq!(try_period_key_of(&DateLike::iso("2024-02-29")).unwrap(), key("2024-02"));
        assert_eq!(try_period_key_of(&DateLike::iso("2025-12-31")).unwrap(), key("2025-12"));
        assert_eq!(try_period_key_of(&DateLike::iso("2025-01-01")).unwrap(), key("2025-01"));
    }

    #[test]
    fn test_calendar_date_ignores_zone() {
        // A bare date is a calendar day wherever it is read
        let date = DateLike::iso("2025-03-01");
        assert_eq!(try_period_key_of_in(&date, offset(-11)).unwrap(), key("2025-03"));
        assert_eq!(try_period_key_of_in(&date, offset(12)).unwrap(), key("2025-03"));
    }

    #[test]
    fn test_native_uses_its_own_zone() {
        // 23:30 on Jan 31 at UTC-5 is already Feb 1 in UTC
        let instant = offset(-5).with_ymd_and_hms(2025, 1, 31, 23, 30, 0).unwrap();
        assert_eq!(try_period_key_of(&DateLike::from(instant)).unwrap(), key("2025-01"));

        // 00:30 on Mar 1 at UTC+9 is still Feb 28 in UTC
        let instant = offset(9).with_ymd_and_hms(2025, 3, 1, 0, 30, 0).unwrap();
        assert_eq!(try_period_key_of(&DateLike::from(instant)).unwrap(), key("2025-03"));
    }

    #[test]
    fn test_epoch_timestamp_reads_in_zone() {
        // 2025-01-31T23:30:00Z
        let ts = DateLike::epoch(1_738_366_200, 0);
        assert_eq!(try_period_key_of(&ts).unwrap(), key("2025-01"));
        assert_eq!(try_period_key_of_in(&ts, offset(2)).unwrap(), key("2025-02"));
    }

    #[test]
    fn test_rfc3339_string_keeps_offset() {
        let date = DateLike::iso("2025-04-30T22:00:00-04:00");
        assert_eq!(try_period_key_of(&date).unwrap(), key("2025-04"));
    }

    #[test]
    fn test_noon_normalization() {
        let noon = DateLike::iso("2025-06-15").at_noon(offset(-7)).unwrap();
        assert_eq!(noon.to_rfc3339(), "2025-06-15T12:00:00-07:00");

        let instant = offset(3).with_ymd_and_hms(2025, 6, 15, 1, 5, 0).unwrap();
        let noon = DateLike::from(instant).at_noon(utc_zone()).unwrap();
        assert_eq!(noon.to_rfc3339(), "2025-06-15T12:00:00+03:00");
    }

    #[test]
    fn test_unparseable_input_is_an_error_when_strict() {
        for bad in ["", "not a date", "2025-02-30", "2025-13-01", "25-01-01"] {
            let err = try_period_key_of(&DateLike::iso(bad)).unwrap_err();
            assert!(matches!(err, SplitError::UnparseableDate(_)), "{}", bad);
        }
        assert!(try_period_key_of(&DateLike::epoch(0, 2_000_000_000)).is_err());
        assert!(try_period_key_of(&DateLike::epoch(i64::MAX, 0)).is_err());
    }

    #[test]
    fn test_fallback_to_current_month_is_observable() {
        let today = NaiveDate::from_ymd_opt(2026, 7, 4).unwrap();
        let lookup = lookup_period_key(&DateLike::iso("garbage"), utc_zone(), today);
        assert!(lookup.is_fallback());
        assert_eq!(lookup.key(), key("2026-07"));
        assert_eq!(
            lookup,
            PeriodLookup::FellBack {
                key: key("2026-07"),
                input: "garbage".to_string()
            }
        );

        let lookup = lookup_period_key(&DateLike::iso("2024-02-29"), utc_zone(), today);
        assert_eq!(lookup, PeriodLookup::Resolved(key("2024-02")));
    }

    #[test]
    fn test_period_key_of_never_fails() {
        let fallback = period_key_of(&DateLike::iso("nope"));
        let now = PeriodKey::current();
        // Tolerate a month rollover between the two clock reads
        assert!(fallback == now || fallback.next() == now);
    }

    #[test]
    fn test_period_boundaries() {
        let bounds = period_boundaries(&key("2024-02"));
        assert_eq!(
            bounds.start.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            "2024-02-01T00:00:00.000Z"
        );
        assert_eq!(
            bounds.end.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            "2024-02-29T23:59:59.999Z"
        );

        let bounds = period_boundaries(&key("2023-02"));
        assert_eq!(bounds.end.format("%Y-%m-%d").to_string(), "2023-02-28");
    }

    #[test]
    fn test_noon_window() {
        let hours = |h: i32| FixedOffset::east_opt(h * 3600).unwrap();
        assert!(noon_stays_on_utc_day(hours(12)));
        assert!(noon_stays_on_utc_day(hours(-11)));
        assert!(noon_stays_on_utc_day(utc_zone()));
        assert!(!noon_stays_on_utc_day(hours(13)));
        assert!(!noon_stays_on_utc_day(hours(14)));
        assert!(!noon_stays_on_utc_day(hours(-12)));
    }

    #[test]
    fn test_native_noon_inside_window_stays_in_period() {
        for hours in [-11, -5, 0, 9, 12] {
            let zone = FixedOffset::east_opt(hours * 3600).unwrap();
            for (y, m, d) in [(2025, 1, 1), (2025, 1, 31), (2024, 2, 29)] {
                let instant = zone.with_ymd_and_hms(y, m, d, 23, 30, 0).unwrap();
                let date = DateLike::Native(instant);
                let period = try_period_key_of(&date).unwrap();
                let noon = date.at_noon(utc_zone()).unwrap();
                assert_eq!((period.year(), period.month()), (y, m));
                assert!(period_boundaries(&period).contains(&noon), "{} at {}h", instant, hours);
            }
        }
    }

    #[test]
    fn test_native_outside_window_keeps_own_month() {
        // 2025-01-01 12:00 +14:00 is 2024-12-31 22:00 UTC
        let zone = FixedOffset::east_opt(14 * 3600).unwrap();
        let date = DateLike::Native(zone.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap());

        let period = try_period_key_of(&date).unwrap();
        assert_eq!(period, key("2025-01"));

        let noon = date.at_noon(utc_zone()).unwrap();
        assert!(!period_boundaries(&period).contains(&noon));
        assert!(period_boundaries(&period.prev()).contains(&noon));
    }

    #[test]
    fn test_serde_shapes() {
        let json = r#"{"seconds": 1700000000, "nanoseconds": 5}"#;
        let ts: DateLike = serde_json::from_str(json).unwrap();
        assert_eq!(ts, DateLike::epoch(1_700_000_000, 5));

        let day: DateLike = serde_json::from_str(r#""2025-01-15""#).unwrap();
        assert_eq!(day, DateLike::iso("2025-01-15"));

        let native: DateLike = serde_json::from_str(r#""2025-01-15T12:00:00+02:00""#).unwrap();
        assert!(matches!(native, DateLike::Native(_)));
        assert_eq!(
            serde_json::to_string(&native).unwrap(),
            r#""2025-01-15T12:00:00+02:00""#
        );

        // Unreadable text still loads; it fails only when resolved
        let junk: DateLike = serde_json::from_str(r#""yesterday""#).unwrap();
        assert_eq!(junk, DateLike::iso("yesterday"));
    }
}
