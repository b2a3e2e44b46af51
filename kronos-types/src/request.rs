//! Prediction request and its validating builder.

use serde::{Deserialize, Serialize};

use crate::config::PredictionDefaults;
use crate::error::KronosError;

/// Parameters for a single prediction call.
///
/// Immutable once built. Construct through [`PredictionRequest::builder`] (or
/// deserialize, which runs the same validation) so every instance satisfies:
/// `lookback > 0`, `pred_len > 0`, `temperature > 0`, `0 < top_p <= 1` and
/// `sample_count >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PredictionParams", into = "PredictionParams")]
pub struct PredictionRequest {
    lookback: u32,
    pred_len: u32,
    temperature: f64,
    top_p: f64,
    sample_count: u32,
    start_date: Option<String>,
}

impl PredictionRequest {
    /// Start a builder seeded with [`PredictionDefaults::default`].
    #[must_use]
    pub fn builder() -> PredictionRequestBuilder {
        PredictionRequestBuilder::from_defaults(PredictionDefaults::default())
    }

    /// Number of historical rows fed to the model.
    #[must_use]
    pub const fn lookback(&self) -> u32 {
        self.lookback
    }

    /// Number of future steps to forecast.
    #[must_use]
    pub const fn pred_len(&self) -> u32 {
        self.pred_len
    }

    /// Sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Nucleus sampling threshold.
    #[must_use]
    pub const fn top_p(&self) -> f64 {
        self.top_p
    }

    /// Number of sampled paths.
    #[must_use]
    pub const fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Optional caller-supplied start date label.
    #[must_use]
    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref()
    }
}

impl Default for PredictionRequest {
    fn default() -> Self {
        let d = PredictionDefaults::default();
        Self {
            lookback: d.lookback,
            pred_len: d.pred_len,
            temperature: d.temperature,
            top_p: d.top_p,
            sample_count: d.sample_count,
            start_date: None,
        }
    }
}

/// Builder for [`PredictionRequest`].
#[derive(Debug, Clone)]
pub struct PredictionRequestBuilder {
    params: PredictionParams,
}

impl PredictionRequestBuilder {
    /// Start from a set of configured defaults.
    #[must_use]
    pub fn from_defaults(defaults: PredictionDefaults) -> Self {
        Self {
            params: PredictionParams {
                lookback: defaults.lookback,
                pred_len: defaults.pred_len,
                temperature: defaults.temperature,
                top_p: defaults.top_p,
                sample_count: defaults.sample_count,
                start_date: None,
            },
        }
    }

    /// Set the lookback length.
    #[must_use]
    pub const fn lookback(mut self, rows: u32) -> Self {
        self.params.lookback = rows;
        self
    }

    /// Set the forecast horizon.
    #[must_use]
    pub const fn pred_len(mut self, steps: u32) -> Self {
        self.params.pred_len = steps;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f64) -> Self {
        self.params.temperature = t;
        self
    }

    /// Set the nucleus sampling threshold.
    #[must_use]
    pub const fn top_p(mut self, p: f64) -> Self {
        self.params.top_p = p;
        self
    }

    /// Set the number of sampled paths.
    #[must_use]
    pub const fn sample_count(mut self, n: u32) -> Self {
        self.params.sample_count = n;
        self
    }

    /// Attach a start date label.
    #[must_use]
    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.params.start_date = Some(date.into());
        self
    }

    /// Validate and build the request.
    ///
    /// # Errors
    /// Returns `InvalidArg` naming the first parameter outside its domain.
    pub fn build(self) -> Result<PredictionRequest, KronosError> {
        PredictionRequest::try_from(self.params)
    }
}

/// Unvalidated wire form of [`PredictionRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PredictionParams {
    #[serde(default = "defaults::lookback")]
    lookback: u32,
    #[serde(default = "defaults::pred_len")]
    pred_len: u32,
    #[serde(default = "defaults::temperature")]
    temperature: f64,
    #[serde(default = "defaults::top_p")]
    top_p: f64,
    #[serde(default = "defaults::sample_count")]
    sample_count: u32,
    #[serde(default)]
    start_date: Option<String>,
}

mod defaults {
    use crate::config::PredictionDefaults;

    pub fn lookback() -> u32 {
        PredictionDefaults::default().lookback
    }
    pub fn pred_len() -> u32 {
        PredictionDefaults::default().pred_len
    }
    pub fn temperature() -> f64 {
        PredictionDefaults::default().temperature
    }
    pub fn top_p() -> f64 {
        PredictionDefaults::default().top_p
    }
    pub fn sample_count() -> u32 {
        PredictionDefaults::default().sample_count
    }
}

impl TryFrom<PredictionParams> for PredictionRequest {
    type Error = KronosError;

    fn try_from(p: PredictionParams) -> Result<Self, Self::Error> {
        if p.lookback == 0 {
            return Err(KronosError::InvalidArg("lookback must be > 0".into()));
        }
        if p.pred_len == 0 {
            return Err(KronosError::InvalidArg("pred_len must be > 0".into()));
        }
        // NaN fails both comparisons below
        if !(p.temperature > 0.0 && p.temperature.is_finite()) {
            return Err(KronosError::InvalidArg(format!(
                "temperature must be > 0, got {}",
                p.temperature
            )));
        }
        if !(p.top_p > 0.0 && p.top_p <= 1.0) {
            return Err(KronosError::InvalidArg(format!(
                "top_p must be in (0, 1], got {}",
                p.top_p
            )));
        }
        if p.sample_count == 0 {
            return Err(KronosError::InvalidArg("sample_count must be >= 1".into()));
        }
        Ok(Self {
            lookback: p.lookback,
            pred_len: p.pred_len,
            temperature: p.temperature,
            top_p: p.top_p,
            sample_count: p.sample_count,
            start_date: p.start_date,
        })
    }
}

impl From<PredictionRequest> for PredictionParams {
    fn from(r: PredictionRequest) -> Self {
        Self {
            lookback: r.lookback,
            pred_len: r.pred_len,
            temperature: r.temperature,
            top_p: r.top_p,
            sample_count: r.sample_count,
            start_date: r.start_date,
        }
    }
}
