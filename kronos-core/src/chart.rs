//! Chart-ready row sequences.

use serde::{Deserialize, Serialize};

use crate::table::{ForecastTable, TimeSeriesRow};
use crate::timeseries::window::WindowSplit;

/// Rows for plotting history, forecast and ground truth together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartBundle {
    /// Lookback rows.
    pub historical: Vec<TimeSeriesRow>,
    /// Forecast rows.
    pub predictions: Vec<TimeSeriesRow>,
    /// Horizon rows when ground truth exists, else empty.
    pub actual: Vec<TimeSeriesRow>,
}

/// Assemble chart rows for a split and its forecast.
#[must_use]
pub fn assemble_chart(split: &WindowSplit<'_>, forecast: &ForecastTable) -> ChartBundle {
    ChartBundle {
        historical: split.lookback.to_rows(),
        predictions: forecast.rows().collect(),
        actual: split
            .ground_truth()
            .map(|view| view.to_rows())
            .unwrap_or_default(),
    }
}
