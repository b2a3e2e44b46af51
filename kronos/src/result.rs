//! Values returned by orchestrator operations.

use kronos_core::{ChartBundle, ForecastTable, Metrics, TimeSeriesRow};
use kronos_types::{Device, ModelKey, ModelSpec};
use serde::{Deserialize, Serialize};

/// The predictor currently held by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedModel {
    /// Catalog entry the predictor was built from.
    pub spec: ModelSpec,
    /// Device the predictor runs on.
    pub device: Device,
    /// Name reported by the predictor implementation.
    pub predictor: String,
}

impl LoadedModel {
    /// Catalog key of the loaded model.
    #[must_use]
    pub const fn key(&self) -> ModelKey {
        self.spec.key
    }
}

/// Where the forecast's target timestamps came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// Every target timestamp was present in the dataset's horizon.
    Dataset,
    /// Some targets came from the horizon, the rest were extrapolated.
    Mixed,
    /// The dataset had no horizon rows; all targets were extrapolated.
    Extrapolated,
}

/// Sampling parameters echoed back with a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParameters {
    /// Sampling temperature.
    pub temperature: f64,
    /// Nucleus sampling threshold.
    pub top_p: f64,
    /// Sampled paths averaged into the forecast.
    pub sample_count: u32,
}

/// Provenance of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionMetadata {
    /// Catalog key of the model that produced the forecast.
    pub model: ModelKey,
    /// Device the model ran on.
    pub device: Device,
    /// Sampling parameters of the request.
    pub parameters: SamplingParameters,
    /// Rows fed to the model.
    pub lookback: usize,
    /// Rows requested from the model.
    pub pred_len: usize,
    /// Caller-supplied start date, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Where the target timestamps came from.
    pub target_source: TargetSource,
}

/// Outcome of [`Kronos::run_prediction`](crate::Kronos::run_prediction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Forecast rows, one per target timestamp.
    pub forecast: ForecastTable,
    /// Ground-truth horizon rows, when the dataset extends past the horizon.
    pub actual: Option<Vec<TimeSeriesRow>>,
    /// Accuracy against `actual`; serialized as `{}` when absent.
    #[serde(with = "kronos_core::metrics::empty_object")]
    pub metrics: Option<Metrics>,
    /// Rows for plotting.
    pub chart: ChartBundle,
    /// Provenance.
    pub metadata: PredictionMetadata,
}
