//! Period service
//!
//! Resolves user-facing period references ("current", "last", "Mar 2025",
//! "2025-03") and derives period keys of dates in the configured zone.

use chrono::Datelike;

use crate::config::settings::Settings;
use crate::error::{SplitError, SplitResult};
use crate::ledger::{lookup_period_key, DateLike, PeriodLookup};
use crate::models::PeriodKey;

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

/// Service for period navigation and keying
pub struct PeriodService<'a> {
    settings: &'a Settings,
}

impl<'a> PeriodService<'a> {
    /// Create a new period service
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// The period containing today in the configured zone
    pub fn current_period(&self) -> PeriodKey {
        PeriodKey::from_date(self.settings.today())
    }

    /// Derive the period of a date-like value
    ///
    /// Unreadable input falls back to the current period; the fallback is
    /// logged and visible in the returned [`PeriodLookup`].
    pub fn key_of(&self, date: &DateLike) -> PeriodLookup {
        let lookup = lookup_period_key(date, self.settings.zone(), self.settings.today());
        if let PeriodLookup::FellBack { key, input } = &lookup {
            tracing::warn!(
                input = %input,
                fallback = %key,
                "unreadable date, using current period"
            );
        }
        lookup
    }

    /// Parse a period reference or use the current period
    pub fn parse_or_current(&self, period: Option<&str>) -> SplitResult<PeriodKey> {
        match period {
            Some(s) => self.parse(s),
            None => Ok(self.current_period()),
        }
    }

    /// Parse a period reference
    ///
    /// Formats supported: "2025-01", "January 2025", "Jan", "current",
    /// "last", "next".
    pub fn parse(&self, s: &str) -> SplitResult<PeriodKey> {
        let s_lower = s.trim().to_lowercase();

        match s_lower.as_str() {
            "current" | "now" | "this" => return Ok(self.current_period()),
            "last" | "previous" | "prev" => return Ok(self.current_period().prev()),
            "next" => return Ok(self.current_period().next()),
            _ => {}
        }

        if let Some(period) = self.parse_month_name(&s_lower) {
            return Ok(period);
        }

        PeriodKey::parse(s.trim())
            .map_err(|e| SplitError::Validation(format!("Invalid period '{}': {}", s.trim(), e)))
    }

    /// Parse month names like "January", "Jan 2025"
    ///
    /// Without a year, the most recent such month up to today is meant.
    fn parse_month_name(&self, s: &str) -> Option<PeriodKey> {
        let (name, rest) = match s.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (s, ""),
        };
        if name.len() < 3 {
            return None;
        }

        let month = MONTH_NAMES
            .iter()
            .position(|full| full.to_lowercase().starts_with(name))? as u32
            + 1;

        let year = if rest.is_empty() {
            let today = self.settings.today();
            if month > today.month() {
                today.year() - 1
            } else {
                today.year()
            }
        } else {
            rest.parse().ok()?
        };

        PeriodKey::new(year, month)
    }

    /// Format a period in a human-friendly way
    pub fn format_period_friendly(&self, period: &PeriodKey) -> String {
        let name = MONTH_NAMES[(period.month() - 1) as usize];
        format!("{} {}", name, period.year())
    }

    /// Check if a period is the current period
    pub fn is_current(&self, period: &PeriodKey) -> bool {
        *period == self.current_period()
    }
}
