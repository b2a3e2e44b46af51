//! Schema normalization into the canonical OHLCV + timestamp layout.
//!
//! Column handling is driven by [`POLICY`], an explicit table of
//! `{column → (requirement, fallback, coercion)}` applied in order, so the
//! output shape does not depend on which optional columns the input carried.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use kronos_types::KronosError;

use crate::raw::{ColumnHints, RawTable, RawValue};
use crate::table::{OhlcvColumns, ValidatedTable};

/// Canonical output columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Canonical {
    /// Row timestamps.
    Timestamps,
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    Close,
    /// Traded volume.
    Volume,
    /// Traded notional amount.
    Amount,
}

impl Canonical {
    /// Canonical column name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timestamps => "timestamps",
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
            Self::Amount => "amount",
        }
    }
}

/// Whether a column must be present in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Absence fails normalization.
    Required,
    /// Absence triggers the column's [`Fallback`].
    Optional,
}

/// Value used when an optional column is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    /// No fallback; the column is required.
    None,
    /// Fill every row with a constant.
    Constant(f64),
    /// `volume * mean(open, high, low, close)` per row.
    VolumeTimesMeanPrice,
    /// Uniform hourly sequence starting at [`SYNTHETIC_EPOCH_SECS`].
    HourlyFromEpoch,
}

/// How present cells are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Parse as a timestamp; unparsable text is an error, nulls become missing.
    Datetime,
    /// Coerce to float; non-coercible cells become missing.
    Numeric,
    /// Coerce to float; non-coercible cells become `0.0`.
    NumericFillZero,
    /// Coerce to float; non-coercible cells become `NaN` but never drop the row.
    NumericPassThrough,
}

/// Normalization rule for one canonical column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnPolicy {
    /// Output column.
    pub column: Canonical,
    /// Input column names, in resolution order.
    pub sources: &'static [&'static str],
    /// Presence requirement.
    pub requirement: Requirement,
    /// Value when absent.
    pub fallback: Fallback,
    /// Coercion of present cells.
    pub coercion: Coercion,
}

/// Start of synthesized timestamp sequences: 2024-01-01T00:00:00Z.
pub const SYNTHETIC_EPOCH_SECS: i64 = 1_704_067_200;

/// Normalization policy, applied top to bottom.
pub const POLICY: [ColumnPolicy; 7] = [
    ColumnPolicy {
        column: Canonical::Timestamps,
        sources: &["timestamps", "timestamp", "date"],
        requirement: Requirement::Optional,
        fallback: Fallback::HourlyFromEpoch,
        coercion: Coercion::Datetime,
    },
    ColumnPolicy {
        column: Canonical::Open,
        sources: &["open"],
        requirement: Requirement::Required,
        fallback: Fallback::None,
        coercion: Coercion::Numeric,
    },
    ColumnPolicy {
        column: Canonical::High,
        sources: &["high"],
        requirement: Requirement::Required,
        fallback: Fallback::None,
        coercion: Coercion::Numeric,
    },
    ColumnPolicy {
        column: Canonical::Low,
        sources: &["low"],
        requirement: Requirement::Required,
        fallback: Fallback::None,
        coercion: Coercion::Numeric,
    },
    ColumnPolicy {
        column: Canonical::Close,
        sources: &["close"],
        requirement: Requirement::Required,
        fallback: Fallback::None,
        coercion: Coercion::Numeric,
    },
    ColumnPolicy {
        column: Canonical::Volume,
        sources: &["volume"],
        requirement: Requirement::Optional,
        fallback: Fallback::Constant(0.0),
        coercion: Coercion::NumericFillZero,
    },
    ColumnPolicy {
        column: Canonical::Amount,
        sources: &["amount"],
        requirement: Requirement::Optional,
        fallback: Fallback::VolumeTimesMeanPrice,
        coercion: Coercion::NumericPassThrough,
    },
];

/// Columns resolved so far, before row filtering.
#[derive(Default)]
struct Resolved {
    timestamps: Vec<Option<DateTime<Utc>>>,
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
    amount: Vec<Option<f64>>,
}

impl Resolved {
    fn mean_price(&self, i: usize) -> Option<f64> {
        Some((self.open[i]? + self.high[i]? + self.low[i]? + self.close[i]?) / 4.0)
    }
}

/// Normalize an arbitrary raw table into a [`ValidatedTable`].
///
/// Steps: apply `hints`; require `open/high/low/close`; resolve timestamps from
/// `timestamps`, `timestamp` or `date` (or synthesize an hourly sequence);
/// coerce prices; fill `volume` with `0.0`; derive `amount` when absent; drop
/// rows missing a price or timestamp. Row order is preserved.
///
/// # Errors
/// - `MissingColumns` listing every absent required column.
/// - `Schema` when a timestamp cell cannot be parsed or a hinted timestamp
///   column does not exist.
pub fn normalize_table(mut raw: RawTable, hints: &ColumnHints) -> Result<ValidatedTable, KronosError> {
    for (from, to) in hints.renames() {
        raw.rename(from, to);
    }

    let missing: Vec<String> = POLICY
        .iter()
        .filter(|p| p.requirement == Requirement::Required)
        .filter(|p| !p.sources.iter().any(|s| raw.has_column(s)))
        .map(|p| p.column.as_str().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(KronosError::MissingColumns(missing));
    }

    let n = raw.row_count();
    let mut resolved = Resolved::default();
    for policy in &POLICY {
        let source = if policy.column == Canonical::Timestamps {
            match hints.timestamp_source() {
                Some(name) => Some(raw.column(name).ok_or_else(|| {
                    KronosError::Schema(format!("timestamp column {name:?} not found"))
                })?),
                None => policy.sources.iter().find_map(|s| raw.column(s)),
            }
        } else {
            policy.sources.iter().find_map(|s| raw.column(s))
        };
        apply_policy(policy, source, n, &mut resolved)?;
    }

    let mut columns = OhlcvColumns::with_capacity(n);
    let mut dropped = 0usize;
    for i in 0..n {
        let (Some(ts), Some(open), Some(high), Some(low), Some(close)) = (
            resolved.timestamps[i],
            resolved.open[i],
            resolved.high[i],
            resolved.low[i],
            resolved.close[i],
        ) else {
            dropped += 1;
            continue;
        };
        columns.timestamps.push(ts);
        columns.open.push(open);
        columns.high.push(high);
        columns.low.push(low);
        columns.close.push(close);
        columns.volume.push(resolved.volume[i].unwrap_or(0.0));
        columns.amount.push(resolved.amount[i].unwrap_or(f64::NAN));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(rows = n, kept = columns.len(), dropped, "normalized table");
    #[cfg(not(feature = "tracing"))]
    let _ = dropped;

    let source_columns = raw.column_names().map(str::to_string).collect();
    Ok(ValidatedTable::new(columns, source_columns))
}

fn apply_policy(
    policy: &ColumnPolicy,
    source: Option<&[RawValue]>,
    n: usize,
    out: &mut Resolved,
) -> Result<(), KronosError> {
    if policy.column == Canonical::Timestamps {
        out.timestamps = match source {
            Some(cells) => cells
                .iter()
                .map(parse_timestamp)
                .collect::<Result<Vec<_>, _>>()?,
            None => synthesize_hourly(n).into_iter().map(Some).collect(),
        };
        return Ok(());
    }

    let values: Vec<Option<f64>> = match (source, policy.fallback) {
        (Some(cells), _) => cells
            .iter()
            .map(|c| match policy.coercion {
                Coercion::NumericFillZero => Some(c.to_f64().unwrap_or(0.0)),
                Coercion::Numeric | Coercion::NumericPassThrough | Coercion::Datetime => {
                    c.to_f64()
                }
            })
            .collect(),
        (None, Fallback::Constant(v)) => vec![Some(v); n],
        (None, Fallback::VolumeTimesMeanPrice) => (0..n)
            .map(|i| {
                let volume = out.volume[i].unwrap_or(0.0);
                Some(out.mean_price(i).map_or(f64::NAN, |m| volume * m))
            })
            .collect(),
        (None, Fallback::None | Fallback::HourlyFromEpoch) => {
            return Err(KronosError::MissingColumns(vec![
                policy.column.as_str().to_string(),
            ]));
        }
    };
    match policy.column {
        Canonical::Open => out.open = values,
        Canonical::High => out.high = values,
        Canonical::Low => out.low = values,
        Canonical::Close => out.close = values,
        Canonical::Volume => out.volume = values,
        Canonical::Amount => out.amount = values,
        Canonical::Timestamps => {}
    }
    Ok(())
}

/// Uniform hourly timestamps starting at 2024-01-01T00:00:00Z.
#[must_use]
pub fn synthesize_hourly(n: usize) -> Vec<DateTime<Utc>> {
    let start = Utc
        .timestamp_opt(SYNTHETIC_EPOCH_SECS, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH);
    (0..n)
        .map(|i| start + TimeDelta::hours(i64::try_from(i).unwrap_or(i64::MAX)))
        .collect()
}

/// Epoch values at or above this magnitude are read as milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Integer missing-time marker written by int64 exports.
const NAT_SENTINEL: i64 = i64::MIN;

/// Parse a raw cell into a timestamp.
///
/// `Null`, `NaN`, the `i64::MIN` marker and empty/`NaT` text are missing
/// (`Ok(None)`). Integers and floats are Unix epoch seconds, or milliseconds
/// when their magnitude is at least `1e11`.
///
/// # Errors
/// Returns `Schema` for text that matches no supported format and for
/// numeric epochs outside the representable range.
pub fn parse_timestamp(cell: &RawValue) -> Result<Option<DateTime<Utc>>, KronosError> {
    match cell {
        RawValue::Null => Ok(None),
        RawValue::Timestamp(t) => Ok(Some(*t)),
        RawValue::Int(NAT_SENTINEL) => Ok(None),
        RawValue::Int(i) => {
            let millis = if i.unsigned_abs() >= MILLIS_THRESHOLD.unsigned_abs() {
                Some(*i)
            } else {
                i.checked_mul(1000)
            };
            millis
                .and_then(from_epoch_millis)
                .map(Some)
                .ok_or_else(|| out_of_range(i))
        }
        RawValue::Float(f) => {
            if !f.is_finite() {
                return Ok(None);
            }
            #[allow(clippy::cast_precision_loss)]
            let millis = if f.abs() >= MILLIS_THRESHOLD as f64 {
                f.round()
            } else {
                (f * 1000.0).round()
            };
            float_to_millis(millis)
                .and_then(from_epoch_millis)
                .map(Some)
                .ok_or_else(|| out_of_range(f))
        }
        RawValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("nat") || s.eq_ignore_ascii_case("nan") {
                return Ok(None);
            }
            parse_datetime_str(s)
                .map(Some)
                .ok_or_else(|| KronosError::Schema(format!("unparsable timestamp: {s:?}")))
        }
    }
}

fn out_of_range(value: impl std::fmt::Display) -> KronosError {
    KronosError::Schema(format!("epoch timestamp out of range: {value}"))
}

/// Whole milliseconds as `i64`, or `None` past the `i64` range.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_millis(ms: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it cannot fit.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (ms > -LIMIT && ms < LIMIT).then(|| ms as i64)
}

fn from_epoch_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a timestamp string in one of the supported layouts.
///
/// Accepts RFC 3339, `YYYY-MM-DD[ T]HH:MM[:SS[.fff]]` with an optional UTC
/// offset, slash-separated dates, and bare dates (midnight UTC). Naive values
/// are taken as UTC.
#[must_use]
pub fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}
