//! Configuration types shared by the orchestrator and its collaborators.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::Device;

/// Default generation parameters applied when a request leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionDefaults {
    /// Number of historical rows fed to the model.
    pub lookback: u32,
    /// Number of future steps to forecast.
    pub pred_len: u32,
    /// Sampling temperature (> 0).
    pub temperature: f64,
    /// Nucleus sampling threshold in (0, 1].
    pub top_p: f64,
    /// Number of sampled paths averaged into the forecast (>= 1).
    pub sample_count: u32,
}

impl Default for PredictionDefaults {
    fn default() -> Self {
        Self {
            lookback: 400,
            pred_len: 120,
            temperature: 1.0,
            top_p: 0.9,
            sample_count: 1,
        }
    }
}

/// Global configuration for the `Kronos` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KronosConfig {
    /// Device used when `load_predictor` is called without one.
    pub default_device: Device,
    /// Directory scanned by `list_data_files`.
    pub data_dir: PathBuf,
    /// File extensions (with leading dot) accepted for ingestion.
    pub allowed_extensions: Vec<String>,
    /// Largest input file accepted for ingestion, in bytes.
    pub max_file_size: u64,
    /// Defaults for prediction requests.
    pub prediction_defaults: PredictionDefaults,
    /// Deadline for a single predictor invocation.
    pub prediction_timeout: Duration,
}

impl Default for KronosConfig {
    fn default() -> Self {
        Self {
            default_device: Device::Cpu,
            data_dir: PathBuf::from("./data"),
            allowed_extensions: vec![".csv".into(), ".feather".into(), ".parquet".into()],
            max_file_size: 100 * 1024 * 1024,
            prediction_defaults: PredictionDefaults::default(),
            prediction_timeout: Duration::from_secs(120),
        }
    }
}

impl KronosConfig {
    /// Returns true when `ext` (without leading dot) is an allowed ingestion extension.
    #[must_use]
    pub fn allows_extension(&self, ext: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
