//! Date masking strategy

use super::{index_from, is_passthrough, keyed_bytes};
use crate::anonymization::seed::SeedContext;
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{CloakError, Result, Row};
use chrono::{Datelike, Duration, NaiveDate};
use serde_json::Value;

/// Text formats recognized and preserved on output, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Deterministically jitters a date within a configured window.
///
/// The offset is derived from a keyed hash of the original text, so the
/// same date always moves to the same replacement. The input's text format
/// is detected from a fixed list and reproduced on output.
///
/// Parameters:
/// - `jitter_days`: maximum absolute offset in days (default 30)
/// - `preserve_year`: clamp the result into the original year (default false)
/// - `preserve_month`: keep the original month component (default false)
pub struct DateMaskingStrategy {
    seed: i64,
    jitter_days: i64,
    preserve_year: bool,
    preserve_month: bool,
}

impl DateMaskingStrategy {
    pub fn from_config(config: &StrategyConfig, seeds: &SeedContext) -> Result<Self> {
        let jitter_days = config.param_i64("jitter_days")?.unwrap_or(30);
        if jitter_days < 1 {
            return Err(CloakError::Configuration(
                "strategy 'date': parameter 'jitter_days' must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            seed: seeds.require()?,
            jitter_days,
            preserve_year: config.param_bool("preserve_year")?.unwrap_or(false),
            preserve_month: config.param_bool("preserve_month")?.unwrap_or(false),
        })
    }

    fn detect_format(text: &str) -> Option<(&'static str, NaiveDate)> {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok().map(|d| (*fmt, d)))
    }

    fn jitter(&self, text: &str, date: NaiveDate) -> NaiveDate {
        let window = 2 * self.jitter_days + 1;
        let offset = (index_from(&keyed_bytes(self.seed, text)) % window as u64) as i64
            - self.jitter_days;
        let mut jittered = date
            .checked_add_signed(Duration::days(offset))
            .unwrap_or(date);

        if self.preserve_year && jittered.year() != date.year() {
            jittered = if jittered.year() < date.year() {
                NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
            } else {
                NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
            };
        }

        if self.preserve_month && jittered.month() != date.month() {
            let day = jittered
                .day()
                .min(days_in_month(jittered.year(), date.month()));
            jittered = NaiveDate::from_ymd_opt(jittered.year(), date.month(), day).unwrap_or(date);
        }

        jittered
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

impl Strategy for DateMaskingStrategy {
    fn name(&self) -> &str {
        "date"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        let text = value.as_str().ok_or_else(|| {
            CloakError::strategy_execution("date", "expected a text value")
        })?;
        let (format, date) = Self::detect_format(text).ok_or_else(|| {
            CloakError::strategy_execution("date", "value does not match any supported date format")
        })?;
        let jittered = self.jitter(text, date);
        Ok(Value::String(jittered.format(format).to_string()))
    }
}
