//! Kronos turns tabular price history into windowed forecasts.
//!
//! Overview
//! - Normalizes arbitrary OHLCV tables into a canonical, column-oriented
//!   schema (`kronos_core::normalize_table`).
//! - Holds one current dataset and one loaded predictor behind a single
//!   reader/writer lock; loads replace them wholesale and only on success.
//! - Slices the dataset into a lookback and a horizon, drives the predictor
//!   over the lookback, and reduces the result into metrics and chart rows.
//!
//! Key behaviors
//! - Ground truth is strict: metrics and the chart's `actual` series are only
//!   produced when the dataset is longer than `lookback + pred_len`. A dataset
//!   of exactly that length gets a forecast with empty metrics.
//! - Target timestamps follow the dataset horizon and are extrapolated from the
//!   lookback cadence when the dataset ends early.
//! - Inference is bounded by `prediction_timeout`; expiry returns
//!   `PredictionTimeout` and releases the state lock.
//! - Concurrent predictions on one predictor are serialized.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use kronos::{ColumnHints, Kronos, RawTable};
//!
//! let kronos = Kronos::builder()
//!     .loader(Arc::new(MyLoader::default()))
//!     .build()?;
//!
//! kronos.load_table(raw, &ColumnHints::new()).await?;
//! kronos.load_predictor("kronos-small", Some("cpu")).await?;
//!
//! let request = kronos.request().lookback(400).pred_len(120).build()?;
//! let result = kronos.run_prediction(&request).await?;
//! println!("{}", serde_json::to_string(&result)?);
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod ops;
mod result;

pub use core::{Kronos, KronosBuilder, tag_err};
pub use result::{
    LoadedModel, PredictionMetadata, PredictionResult, SamplingParameters, TargetSource,
};

pub use kronos_core::{
    ChartBundle, ColumnHints, DataFile, DataInfo, ForecastTable, GenerateRequest,
    GenerationParams, Metrics, PriceRange, PriceWindow, Predictor, PredictorLoader, RawTable,
    RawValue, TableView, Timeframe, TimeSeriesRow, ValidatedTable, detect_timeframe,
    normalize_table, summarize,
};
pub use kronos_types::{
    Device, ErrorKind, KronosConfig, KronosError, ModelKey, ModelSpec, PredictionDefaults,
    PredictionRequest, PredictionRequestBuilder, Resource,
};
