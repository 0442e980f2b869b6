use ahash::AHashMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use fuzzyjoin_core::{Column, Error, JoinColumnSpec, Key, KeyColumn, Result, Value};
use std::ops::Range;

use super::{key_name, MatchStrategy};
use crate::classify::MatchCategory;
use crate::distance::nearest_timestamp;

const MICROS_PER_SECOND: f64 = 1_000_000.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d %B %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%d %b %Y", "%B %d, %Y", "%b %d, %Y", "%Y%m%d",
];

/// Parse a value into microseconds since the Unix epoch
///
/// Text is tried as RFC 3339, RFC 2822 and a set of common layouts; values
/// without an offset are taken as UTC. Numbers are Unix seconds.
pub fn parse_timestamp(value: &Value) -> std::result::Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Int(secs) => secs
            .checked_mul(1_000_000)
            .map(Some)
            .ok_or_else(|| format!("timestamp {} out of range", secs)),
        Value::Float(secs) if secs.is_nan() => Ok(None),
        Value::Float(secs) => {
            let micros = (secs * MICROS_PER_SECOND).round();
            if micros.is_finite() && micros.abs() < i64::MAX as f64 {
                Ok(Some(micros as i64))
            } else {
                Err(format!("timestamp {} out of range", secs))
            }
        }
        Value::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            parse_text(s)
                .map(Some)
                .ok_or_else(|| format!("unrecognised date/time '{}'", s))
        }
        Value::Bool(_) | Value::Vector(_) => Err(format!("'{}' is not a date/time", value)),
    }
}

fn parse_text(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_micros());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_micros());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_micros());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_micros());
        }
    }
    None
}

/// Nearest-timestamp matching within a window derived from the data
///
/// The tolerance is `(1 - accuracy)` times the smaller of the two column time
/// ranges, or `accuracy` seconds when the tolerance is absolute.
pub struct DateTimeMatch {
    index: usize,
    /// Parsed timestamps of the whole left column
    left: Vec<Option<i64>>,
    /// Distinct right timestamps, ascending
    choices: Vec<i64>,
    /// Microseconds
    tolerance: f64,
    right_keys: Vec<KeyColumn>,
}

impl DateTimeMatch {
    pub fn new(index: usize, spec: &JoinColumnSpec, left: &Column, right: &Column) -> Result<Self> {
        let left_times = parse_column(left)?;
        let right_times = parse_column(right)?;

        let mut choices: Vec<i64> = right_times.iter().flatten().copied().collect();
        choices.sort_unstable();
        choices.dedup();

        let tolerance = if spec.absolute {
            spec.accuracy * MICROS_PER_SECOND
        } else {
            let range = time_range(&left_times).min(time_range(&right_times));
            (1.0 - spec.accuracy) * range as f64
        };

        let keys = right_times.into_iter().map(|t| t.map(Key::Timestamp)).collect();
        Ok(Self {
            index,
            left: left_times,
            choices,
            tolerance,
            right_keys: vec![KeyColumn::new(
                key_name("right", MatchCategory::DateTime, index, None),
                keys,
            )],
        })
    }

    pub fn tolerance_micros(&self) -> f64 {
        self.tolerance
    }
}

impl MatchStrategy for DateTimeMatch {
    fn category(&self) -> MatchCategory {
        MatchCategory::DateTime
    }

    fn right_keys(&self) -> &[KeyColumn] {
        &self.right_keys
    }

    fn left_keys(&self, rows: Range<usize>) -> Result<Vec<KeyColumn>> {
        let mut matches: AHashMap<i64, Option<i64>> = AHashMap::new();
        let keys = self.left[rows]
            .iter()
            .map(|t| {
                let t = (*t)?;
                let matched = *matches
                    .entry(t)
                    .or_insert_with(|| nearest_timestamp(t, &self.choices, self.tolerance));
                matched.map(Key::Timestamp)
            })
            .collect();
        Ok(vec![KeyColumn::new(
            key_name("left", MatchCategory::DateTime, self.index, None),
            keys,
        )])
    }
}

fn parse_column(column: &Column) -> Result<Vec<Option<i64>>> {
    column
        .values
        .iter()
        .enumerate()
        .map(|(row, value)| {
            parse_timestamp(value).map_err(|reason| Error::invalid_value(&column.name, row, reason))
        })
        .collect()
}

/// `max - min` over the non-null timestamps, 0 when there are none
fn time_range(times: &[Option<i64>]) -> i64 {
    let mut bounds: Option<(i64, i64)> = None;
    for &t in times.iter().flatten() {
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(t), hi.max(t)),
            None => (t, t),
        });
    }
    bounds.map_or(0, |(lo, hi)| hi.saturating_sub(lo))
}
