//! User settings for SplitIt
//!
//! Manages display preferences, the zone dates are interpreted in, and the
//! balance alert threshold.

use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::paths::SplitPaths;
use crate::error::SplitError;
use crate::ledger::noon_stays_on_utc_day;
use crate::models::money::decimal;
use crate::models::Money;

/// User settings for SplitIt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Offset from UTC used for bare dates, epoch timestamps and "today"
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Absolute balance at which a member is flagged
    #[serde(default = "default_alert_threshold", with = "decimal")]
    pub balance_alert_threshold: Money,

    /// Category assigned to expenses entered without one
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_alert_threshold() -> Money {
    Money::from_cents(10000)
}

fn default_category() -> String {
    "uncategorized".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            utc_offset_minutes: 0,
            balance_alert_threshold: default_alert_threshold(),
            default_category: default_category(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &SplitPaths) -> Result<Self, SplitError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| SplitError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                SplitError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SplitPaths) -> Result<(), SplitError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SplitError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SplitError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Check the values that have a restricted range
    pub fn validate(&self) -> Result<(), SplitError> {
        let zone = FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60));
        if !zone.map_or(false, noon_stays_on_utc_day) {
            return Err(SplitError::Config(format!(
                "utc_offset_minutes must be above -720 and at most 720, got {}",
                self.utc_offset_minutes
            )));
        }
        if self.balance_alert_threshold.is_negative() {
            return Err(SplitError::Config(
                "balance_alert_threshold cannot be negative".into(),
            ));
        }
        Ok(())
    }

    /// The zone bare dates and epoch timestamps are read in
    pub fn zone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(crate::ledger::utc_zone)
    }

    /// Today's date in the configured zone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.zone()).date_naive()
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format a date with the configured pattern
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.utc_offset_minutes, 0);
        assert_eq!(settings.balance_alert_threshold, Money::from_cents(10000));
        assert_eq!(settings.default_category, "uncategorized");
        assert_eq!(settings.zone(), crate::ledger::utc_zone());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            currency_symbol: "€".to_string(),
            utc_offset_minutes: 60,
            balance_alert_threshold: Money::from_cents(2500),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.zone(), FixedOffset::east_opt(3600).unwrap());
        assert_eq!(loaded.balance_alert_threshold, Money::from_cents(2500));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "£"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "£");
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.balance_alert_threshold, Money::from_cents(10000));
    }

    #[test]
    fn test_threshold_is_stored_as_decimal() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains(r#""balance_alert_threshold":100.0"#));
    }

    #[test]
    fn test_out_of_range_offset_is_rejected() {
        for minutes in [15 * 60, 14 * 60, 13 * 60, 12 * 60 + 1, -12 * 60, -14 * 60] {
            let settings = Settings {
                utc_offset_minutes: minutes,
                ..Settings::default()
            };
            assert!(settings.validate().is_err(), "offset {} accepted", minutes);
        }

        for minutes in [12 * 60, 5 * 60 + 30, 0, -11 * 60 - 59] {
            let settings = Settings {
                utc_offset_minutes: minutes,
                ..Settings::default()
            };
            assert!(settings.validate().is_ok(), "offset {} rejected", minutes);
        }
    }

    #[test]
    fn test_format_helpers() {
        let settings = Settings {
            date_format: "%d/%m/%Y".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.format_money(Money::from_cents(-1050)), "-$10.50");
        assert_eq!(
            settings.format_date(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()),
            "09/03/2025"
        );
    }
}
