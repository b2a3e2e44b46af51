use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kronos_types::{Device, KronosError, ModelSpec, PredictionRequest};

use crate::table::{ForecastTable, TableView};

/// Lookback prices handed to a predictor, one vector per feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceWindow {
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
}

impl PriceWindow {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Returns true when the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

impl From<&TableView<'_>> for PriceWindow {
    fn from(view: &TableView<'_>) -> Self {
        Self {
            open: view.open().to_vec(),
            high: view.high().to_vec(),
            low: view.low().to_vec(),
            close: view.close().to_vec(),
            volume: view.volume().to_vec(),
        }
    }
}

/// Sampling parameters forwarded to the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Number of rows to forecast.
    pub pred_len: usize,
    /// Sampling temperature.
    pub temperature: f64,
    /// Nucleus sampling threshold.
    pub top_p: f64,
    /// Sampled paths averaged into the forecast.
    pub sample_count: u32,
}

impl From<&PredictionRequest> for GenerationParams {
    fn from(req: &PredictionRequest) -> Self {
        Self {
            pred_len: req.pred_len() as usize,
            temperature: req.temperature(),
            top_p: req.top_p(),
            sample_count: req.sample_count(),
        }
    }
}

/// Input to one [`Predictor::generate`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Lookback prices.
    pub window: PriceWindow,
    /// Timestamps of the lookback rows.
    pub input_times: Vec<DateTime<Utc>>,
    /// Timestamps the forecast rows must carry, `params.pred_len` long.
    pub target_times: Vec<DateTime<Utc>>,
    /// Sampling parameters.
    pub params: GenerationParams,
}

/// A loaded forecasting model.
///
/// Implementations are opaque; the only contract is that the returned table
/// has one row per entry of `target_times`, in order.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Stable identifier used to tag errors and metadata.
    fn name(&self) -> &'static str;

    /// Produce a forecast for the requested target timestamps.
    async fn generate(&self, req: GenerateRequest) -> Result<ForecastTable, KronosError>;
}

/// Constructs predictors from catalog entries.
#[async_trait]
pub trait PredictorLoader: Send + Sync {
    /// Build a predictor for `spec` on `device`.
    ///
    /// `spec.context_length` bounds the lookback the predictor must accept.
    async fn load(&self, spec: &ModelSpec, device: Device) -> Result<Arc<dyn Predictor>, KronosError>;
}
