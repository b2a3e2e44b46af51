//! Canonical OHLCV tables.
//!
//! Tables are stored column-oriented; row records ([`TimeSeriesRow`]) are only
//! materialized at the serialization boundary or on explicit request.

use std::ops::Range;

use chrono::{DateTime, Utc};
use kronos_types::KronosError;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One canonical row.
///
/// No ordering invariant is enforced between `open`, `high`, `low` and `close`;
/// source data passes through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    /// Bar timestamp (UTC).
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
    /// Traded notional amount.
    ///
    /// May be `NaN` when the source cell was not numeric; JSON writes that as
    /// `null`, which reads back as `NaN`.
    #[serde(deserialize_with = "nan_from_null")]
    pub amount: f64,
}

fn nan_from_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Element-wise equality that treats two `NaN`s as equal.
fn same_values(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
}

/// Parallel OHLCV columns sharing one timestamp index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OhlcvColumns {
    /// Row timestamps.
    pub timestamps: Vec<DateTime<Utc>>,
    /// Opening prices.
    pub open: Vec<f64>,
    /// Highest prices.
    pub high: Vec<f64>,
    /// Lowest prices.
    pub low: Vec<f64>,
    /// Closing prices.
    pub close: Vec<f64>,
    /// Volumes.
    pub volume: Vec<f64>,
    /// Notional amounts.
    pub amount: Vec<f64>,
}

impl OhlcvColumns {
    /// Empty columns with room for `n` rows.
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(n),
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            volume: Vec::with_capacity(n),
            amount: Vec::with_capacity(n),
        }
    }

    /// Append one row.
    pub fn push(&mut self, row: TimeSeriesRow) {
        self.timestamps.push(row.timestamp);
        self.open.push(row.open);
        self.high.push(row.high);
        self.low.push(row.low);
        self.close.push(row.close);
        self.volume.push(row.volume);
        self.amount.push(row.amount);
    }

    /// Number of rows, as given by the timestamp index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns true when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Verify every column has the same length as the timestamp index.
    ///
    /// # Errors
    /// Returns `Prediction` naming the first ragged column.
    pub fn ensure_aligned(&self) -> Result<(), KronosError> {
        let n = self.len();
        let cols = [
            ("open", self.open.len()),
            ("high", self.high.len()),
            ("low", self.low.len()),
            ("close", self.close.len()),
            ("volume", self.volume.len()),
            ("amount", self.amount.len()),
        ];
        match cols.iter().find(|(_, len)| *len != n) {
            Some((name, len)) => Err(KronosError::Prediction(format!(
                "column {name} has {len} rows, expected {n}"
            ))),
            None => Ok(()),
        }
    }

    fn row(&self, i: usize) -> TimeSeriesRow {
        TimeSeriesRow {
            timestamp: self.timestamps[i],
            open: self.open[i],
            high: self.high[i],
            low: self.low[i],
            close: self.close[i],
            volume: self.volume[i],
            amount: self.amount[i],
        }
    }
}

impl FromIterator<TimeSeriesRow> for OhlcvColumns {
    fn from_iter<I: IntoIterator<Item = TimeSeriesRow>>(iter: I) -> Self {
        let mut cols = Self::default();
        for row in iter {
            cols.push(row);
        }
        cols
    }
}

fn serialize_rows<S: Serializer>(
    rows: impl ExactSizeIterator<Item = TimeSeriesRow>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(rows.len()))?;
    for row in rows {
        seq.serialize_element(&row)?;
    }
    seq.end()
}

/// Validated, canonical price series.
///
/// Only produced by [`normalize_table`](crate::normalize::normalize_table):
/// every row has a timestamp and finite open/high/low/close, volume is never
/// missing. Timestamps are assumed non-decreasing but not verified.
///
/// Equality compares row data only, with `NaN` equal to `NaN`; the remembered
/// source column names are provenance and do not participate.
#[derive(Debug, Clone)]
pub struct ValidatedTable {
    columns: OhlcvColumns,
    source_columns: Vec<String>,
}

impl ValidatedTable {
    pub(crate) const fn new(columns: OhlcvColumns, source_columns: Vec<String>) -> Self {
        Self {
            columns,
            source_columns,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names of the raw input this table was normalized from.
    #[must_use]
    pub fn source_columns(&self) -> &[String] {
        &self.source_columns
    }

    /// Underlying columns.
    #[must_use]
    pub const fn columns(&self) -> &OhlcvColumns {
        &self.columns
    }

    /// Timestamp index.
    #[must_use]
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.columns.timestamps
    }

    /// Opening prices.
    #[must_use]
    pub fn open(&self) -> &[f64] {
        &self.columns.open
    }

    /// Highest prices.
    #[must_use]
    pub fn high(&self) -> &[f64] {
        &self.columns.high
    }

    /// Lowest prices.
    #[must_use]
    pub fn low(&self) -> &[f64] {
        &self.columns.low
    }

    /// Closing prices.
    #[must_use]
    pub fn close(&self) -> &[f64] {
        &self.columns.close
    }

    /// Volumes.
    #[must_use]
    pub fn volume(&self) -> &[f64] {
        &self.columns.volume
    }

    /// Notional amounts.
    #[must_use]
    pub fn amount(&self) -> &[f64] {
        &self.columns.amount
    }

    /// Row at `i`, if in range.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<TimeSeriesRow> {
        (i < self.len()).then(|| self.columns.row(i))
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = TimeSeriesRow> + '_ {
        (0..self.len()).map(|i| self.columns.row(i))
    }

    /// Borrow rows `[range.start, range.end)`, clamped to the table length.
    #[must_use]
    pub fn view(&self, range: Range<usize>) -> TableView<'_> {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        TableView {
            table: self,
            start,
            end,
        }
    }
}

impl PartialEq for ValidatedTable {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.columns, &other.columns);
        a.timestamps == b.timestamps
            && same_values(&a.open, &b.open)
            && same_values(&a.high, &b.high)
            && same_values(&a.low, &b.low)
            && same_values(&a.close, &b.close)
            && same_values(&a.volume, &b.volume)
            && same_values(&a.amount, &b.amount)
    }
}

impl Serialize for ValidatedTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_rows(self.rows(), serializer)
    }
}

/// Borrowed contiguous slice of a [`ValidatedTable`].
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    table: &'a ValidatedTable,
    start: usize,
    end: usize,
}

impl<'a> TableView<'a> {
    /// Index of the first row within the parent table.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// One past the index of the last row within the parent table.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of rows in the view.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true when the view holds no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Timestamp index.
    #[must_use]
    pub fn timestamps(&self) -> &'a [DateTime<Utc>] {
        &self.table.timestamps()[self.start..self.end]
    }

    /// Opening prices.
    #[must_use]
    pub fn open(&self) -> &'a [f64] {
        &self.table.open()[self.start..self.end]
    }

    /// Highest prices.
    #[must_use]
    pub fn high(&self) -> &'a [f64] {
        &self.table.high()[self.start..self.end]
    }

    /// Lowest prices.
    #[must_use]
    pub fn low(&self) -> &'a [f64] {
        &self.table.low()[self.start..self.end]
    }

    /// Closing prices.
    #[must_use]
    pub fn close(&self) -> &'a [f64] {
        &self.table.close()[self.start..self.end]
    }

    /// Volumes.
    #[must_use]
    pub fn volume(&self) -> &'a [f64] {
        &self.table.volume()[self.start..self.end]
    }

    /// Notional amounts.
    #[must_use]
    pub fn amount(&self) -> &'a [f64] {
        &self.table.amount()[self.start..self.end]
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = TimeSeriesRow> + 'a {
        let cols = self.table.columns();
        (self.start..self.end).map(move |i| cols.row(i))
    }

    /// Materialize the view as row records.
    #[must_use]
    pub fn to_rows(&self) -> Vec<TimeSeriesRow> {
        self.rows().collect()
    }
}

impl Serialize for TableView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_rows(self.rows(), serializer)
    }
}

/// Forecast produced by a predictor, indexed by the requested target timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastTable {
    columns: OhlcvColumns,
}

impl ForecastTable {
    /// Wrap predictor output columns.
    ///
    /// # Errors
    /// Returns `Prediction` if the columns have different lengths.
    pub fn new(columns: OhlcvColumns) -> Result<Self, KronosError> {
        columns.ensure_aligned()?;
        Ok(Self { columns })
    }

    /// Number of forecast rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when there are no forecast rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Underlying columns.
    #[must_use]
    pub const fn columns(&self) -> &OhlcvColumns {
        &self.columns
    }

    /// Target timestamps.
    #[must_use]
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.columns.timestamps
    }

    /// Forecast closing prices.
    #[must_use]
    pub fn close(&self) -> &[f64] {
        &self.columns.close
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = TimeSeriesRow> + '_ {
        (0..self.len()).map(|i| self.columns.row(i))
    }
}

impl FromIterator<TimeSeriesRow> for ForecastTable {
    fn from_iter<I: IntoIterator<Item = TimeSeriesRow>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl Serialize for ForecastTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_rows(self.rows(), serializer)
    }
}

impl<'de> Deserialize<'de> for ForecastTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<TimeSeriesRow>::deserialize(deserializer)?;
        Ok(rows.into_iter().collect())
    }
}
