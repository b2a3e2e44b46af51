//! Deterministic predictors and loaders for tests, demos and CI.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kronos_core::{ForecastTable, GenerateRequest, OhlcvColumns, Predictor, PredictorLoader};
use kronos_types::{Device, KronosError, ModelKey, ModelSpec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

mod dynamic;

pub use dynamic::{DynamicMockController, DynamicMockPredictor, MockBehavior};

/// Price a random walk starts from when the lookback window is empty.
const FALLBACK_PRICE: f64 = 100.0;

/// Largest per-step relative move at temperature 1.0.
const STEP_SCALE: f64 = 0.01;

/// Forecast that repeats the last lookback close at every target timestamp.
///
/// Volume carries over the last observed volume; amount is `volume * close`.
#[must_use]
pub fn flat_forecast(req: &GenerateRequest) -> ForecastTable {
    let close = req.window.close.last().copied().unwrap_or(FALLBACK_PRICE);
    let volume = req.window.volume.last().copied().unwrap_or(0.0);
    let n = req.target_times.len();
    let columns = OhlcvColumns {
        timestamps: req.target_times.clone(),
        open: vec![close; n],
        high: vec![close; n],
        low: vec![close; n],
        close: vec![close; n],
        volume: vec![volume; n],
        amount: vec![volume * close; n],
    };
    ForecastTable::new(columns).unwrap_or_default()
}

/// Deterministic random-walk predictor for CI-safe examples and tests.
///
/// Each target step moves the previous close by a seeded uniform draw scaled
/// by `temperature`; `sample_count` draws are averaged per step. The same
/// seed and request always produce the same forecast.
pub struct MockPredictor {
    name: &'static str,
    seed: u64,
}

impl Default for MockPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPredictor {
    /// Predictor named `kronos-mock` with seed 42.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: "kronos-mock",
            seed: 42,
        }
    }

    /// Predictor named after a catalog entry.
    #[must_use]
    pub const fn for_model(key: ModelKey) -> Self {
        Self {
            name: key.as_str(),
            seed: 42,
        }
    }

    /// Override the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    fn name(&self) -> &'static str {
        self.name
    }

    #[allow(clippy::cast_precision_loss)]
    async fn generate(&self, req: GenerateRequest) -> Result<ForecastTable, KronosError> {
        if req.window.is_empty() {
            return Err(KronosError::Prediction(
                "lookback window is empty".to_string(),
            ));
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let samples = req.params.sample_count.max(1);
        let scale = STEP_SCALE * req.params.temperature;
        let volume = req.window.volume.iter().sum::<f64>() / req.window.len() as f64;

        let n = req.target_times.len();
        let mut columns = OhlcvColumns::with_capacity(n);
        let mut prev = req.window.close.last().copied().unwrap_or(FALLBACK_PRICE);
        for &ts in &req.target_times {
            let drift: f64 = (0..samples)
                .map(|_| rng.random_range(-1.0f64..=1.0))
                .sum::<f64>()
                / f64::from(samples);
            let close = prev * drift.mul_add(scale, 1.0);
            let (lo, hi) = if close < prev { (close, prev) } else { (prev, close) };
            columns.timestamps.push(ts);
            columns.open.push(prev);
            columns.high.push(hi * (1.0 + scale / 10.0));
            columns.low.push(lo * (1.0 - scale / 10.0));
            columns.close.push(close);
            columns.volume.push(volume);
            columns.amount.push(volume * (prev + close) / 2.0);
            prev = close;
        }
        ForecastTable::new(columns)
    }
}

/// Loader that builds [`MockPredictor`]s and records every load.
#[derive(Clone, Default)]
pub struct MockLoader {
    failing: HashSet<ModelKey>,
    delay: Option<Duration>,
    predictor: Option<Arc<dyn Predictor>>,
    loads: Arc<Mutex<Vec<(ModelKey, Device)>>>,
}

impl MockLoader {
    /// Loader that succeeds for every catalog entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads of `key` fail with a `Load` error.
    #[must_use]
    pub fn fail_for(mut self, key: ModelKey) -> Self {
        self.failing.insert(key);
        self
    }

    /// Sleep for `delay` before every load.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Hand out this predictor instead of building a [`MockPredictor`].
    #[must_use]
    pub fn with_predictor(mut self, predictor: Arc<dyn Predictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    /// Successful and failed loads, in call order.
    pub async fn loads(&self) -> Vec<(ModelKey, Device)> {
        self.loads.lock().await.clone()
    }
}

#[async_trait]
impl PredictorLoader for MockLoader {
    async fn load(&self, spec: &ModelSpec, device: Device) -> Result<Arc<dyn Predictor>, KronosError> {
        self.loads.lock().await.push((spec.key, device));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&spec.key) {
            return Err(KronosError::Load(format!(
                "forced failure: {} on {device}",
                spec.model_id
            )));
        }
        Ok(match &self.predictor {
            Some(p) => Arc::clone(p),
            None => Arc::new(MockPredictor::for_model(spec.key)),
        })
    }
}
