//! Dataset summaries.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::table::ValidatedTable;
use crate::timeseries::timeframe::detect_timeframe;

/// Inclusive price bounds over open/high/low/close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest observed price.
    pub min: f64,
    /// Highest observed price.
    pub max: f64,
}

/// Summary of the current dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataInfo {
    /// Row count after normalization.
    pub rows: usize,
    /// Source columns followed by any canonical columns the normalizer added.
    pub columns: Vec<String>,
    /// Earliest timestamp (RFC 3339).
    pub start_date: Option<String>,
    /// Latest timestamp (RFC 3339).
    pub end_date: Option<String>,
    /// Price bounds; absent for an empty table.
    pub price_range: Option<PriceRange>,
    /// Sampling interval label, e.g. `"5 minutes"`.
    pub timeframe: String,
}

const ADDED_COLUMNS: [&str; 3] = ["timestamps", "volume", "amount"];

/// Summarize a validated table.
#[must_use]
pub fn summarize(table: &ValidatedTable) -> DataInfo {
    let mut columns = table.source_columns().to_vec();
    for name in ADDED_COLUMNS {
        if !columns.iter().any(|c| c == name) {
            columns.push(name.to_string());
        }
    }

    let fmt = |t: &chrono::DateTime<chrono::Utc>| t.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    let ts = table.timestamps();

    DataInfo {
        rows: table.len(),
        columns,
        start_date: ts.iter().min().map(fmt),
        end_date: ts.iter().max().map(fmt),
        price_range: price_range(table),
        timeframe: detect_timeframe(ts).to_string(),
    }
}

fn price_range(table: &ValidatedTable) -> Option<PriceRange> {
    let mut prices = [table.open(), table.high(), table.low(), table.close()]
        .into_iter()
        .flatten()
        .copied();
    let first = prices.next()?;
    let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Some(PriceRange { min, max })
}
