//! kronos-core
//!
//! Domain logic for the Kronos forecasting platform, independent of any
//! runtime state.
//!
//! - `raw`: untyped tables as they arrive from files or request bodies.
//! - `normalize`: the column policy that turns a raw table into a
//!   [`ValidatedTable`].
//! - `timeseries`: step inference, timeframe labels and window slicing.
//! - `metrics` / `chart`: reduction of a forecast into accuracy numbers and
//!   plottable rows.
//! - `predictor`: the [`Predictor`] and [`PredictorLoader`] capability traits.
//! - `ingest`: data-directory listing and, with the `dataframe` feature,
//!   CSV/Parquet/Feather reading through polars.
//!
//! Tables are column-oriented throughout. Row records ([`TimeSeriesRow`]) are
//! produced only when serializing or assembling chart data.
#![warn(missing_docs)]

/// Chart row assembly.
pub mod chart;
/// Data-file discovery and file reading.
pub mod ingest;
/// Dataset summaries.
pub mod info;
/// Forecast accuracy metrics.
pub mod metrics;
pub mod normalize;
/// Predictor capability traits and request types.
pub mod predictor;
/// Raw table model.
pub mod raw;
/// Canonical column-oriented tables.
pub mod table;
pub mod timeseries;

pub use chart::{ChartBundle, assemble_chart};
pub use info::{DataInfo, PriceRange, summarize};
#[cfg(feature = "dataframe")]
pub use ingest::{raw_table_from_frame, read_table};
pub use ingest::{DataFile, TableFormat, list_data_files};
pub use metrics::{Metrics, compute_metrics, evaluate};
pub use normalize::{normalize_table, parse_datetime_str, parse_timestamp};
pub use predictor::{GenerateRequest, GenerationParams, Predictor, PredictorLoader, PriceWindow};
pub use raw::{ColumnHints, RawColumn, RawTable, RawValue};
pub use table::{ForecastTable, OhlcvColumns, TableView, TimeSeriesRow, ValidatedTable};
pub use timeseries::infer::{estimate_step_seconds, extend_timestamps, target_timestamps};
pub use timeseries::timeframe::{Timeframe, detect_timeframe};
pub use timeseries::window::{WindowSplit, slice_windows};

pub use kronos_types::{
    Device, ErrorKind, KronosConfig, KronosError, ModelKey, ModelSpec, PredictionDefaults,
    PredictionRequest, PredictionRequestBuilder, Resource,
};
