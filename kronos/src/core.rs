use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use kronos_core::{Predictor, PredictorLoader, ValidatedTable};
use kronos_types::{Device, KronosConfig, KronosError, ModelSpec, PredictionDefaults};
use tokio::sync::{Mutex, RwLock};

/// A constructed predictor together with the catalog entry it was built from.
pub(crate) struct ActiveModel {
    pub(crate) spec: ModelSpec,
    pub(crate) device: Device,
    pub(crate) predictor: Arc<dyn Predictor>,
    /// Serializes `generate` calls on this predictor.
    pub(crate) gate: Mutex<()>,
}

/// Everything a prediction reads; replaced wholesale by loads.
#[derive(Default)]
pub(crate) struct State {
    pub(crate) dataset: Option<Arc<ValidatedTable>>,
    pub(crate) model: Option<Arc<ActiveModel>>,
}

/// Orchestrator that owns the current dataset and predictor.
///
/// Predictions hold a read guard on the shared state for their whole duration;
/// loads parse or construct outside the lock and then take the write guard to
/// swap in the result. A load issued while a prediction is running therefore
/// waits for it, and never changes what that prediction sees.
pub struct Kronos {
    pub(crate) loader: Arc<dyn PredictorLoader>,
    pub(crate) cfg: KronosConfig,
    pub(crate) state: RwLock<State>,
}

/// Builder for constructing a `Kronos` orchestrator with custom configuration.
pub struct KronosBuilder {
    loader: Option<Arc<dyn PredictorLoader>>,
    cfg: KronosConfig,
}

impl Default for KronosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KronosBuilder {
    /// Create a new builder with default configuration and no loader.
    ///
    /// Defaults: CPU device, `./data` data directory, `.csv`/`.feather`/`.parquet`
    /// ingestion up to 100 MiB, lookback 400 / horizon 120, 120 s inference deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader: None,
            cfg: KronosConfig::default(),
        }
    }

    /// Register the loader used by `load_predictor`.
    #[must_use]
    pub fn loader(mut self, loader: Arc<dyn PredictorLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Replace the whole configuration.
    ///
    /// Modifiers called afterwards still override individual fields.
    #[must_use]
    pub fn config(mut self, cfg: KronosConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Device used when `load_predictor` is called without one.
    #[must_use]
    pub const fn device(mut self, device: Device) -> Self {
        self.cfg.default_device = device;
        self
    }

    /// Deadline for a single predictor invocation.
    ///
    /// Expiry drops the in-flight inference and surfaces `PredictionTimeout`.
    #[must_use]
    pub const fn prediction_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.prediction_timeout = timeout;
        self
    }

    /// Directory scanned by `list_data_files`.
    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.data_dir = dir.into();
        self
    }

    /// Largest input file accepted by `load_file`, in bytes.
    #[must_use]
    pub const fn max_file_size(mut self, bytes: u64) -> Self {
        self.cfg.max_file_size = bytes;
        self
    }

    /// Defaults used by [`Kronos::request`].
    #[must_use]
    pub const fn prediction_defaults(mut self, defaults: PredictionDefaults) -> Self {
        self.cfg.prediction_defaults = defaults;
        self
    }

    /// Build the `Kronos` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no loader was registered or the prediction
    /// timeout is zero.
    pub fn build(self) -> Result<Kronos, KronosError> {
        let Some(loader) = self.loader else {
            return Err(KronosError::InvalidArg(
                "no predictor loader registered; add one via loader(...)".to_string(),
            ));
        };
        if self.cfg.prediction_timeout.is_zero() {
            return Err(KronosError::InvalidArg(
                "prediction_timeout must be non-zero".to_string(),
            ));
        }
        Ok(Kronos {
            loader,
            cfg: self.cfg,
            state: RwLock::new(State::default()),
        })
    }
}

/// Attribute a predictor failure to the predictor that produced it.
///
/// Errors that already carry attribution, or that describe caller mistakes,
/// pass through unchanged.
pub fn tag_err(predictor: &str, e: KronosError) -> KronosError {
    match e {
        e @ (KronosError::PredictionTimeout { .. }
        | KronosError::NotReady { .. }
        | KronosError::InvalidArg(_)) => e,
        KronosError::Prediction(msg) => KronosError::Prediction(format!("{predictor}: {msg}")),
        other => KronosError::Prediction(format!("{predictor}: {other}")),
    }
}

impl Kronos {
    /// Start building a new `Kronos` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let kronos = kronos::Kronos::builder()
    ///     .loader(Arc::new(MyLoader::default()))
    ///     .prediction_timeout(Duration::from_secs(30))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> KronosBuilder {
        KronosBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &KronosConfig {
        &self.cfg
    }

    /// Wrap a predictor future with the inference deadline and standardized
    /// timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "kronos::core::predict_with_timeout",
            skip(fut),
            fields(
                predictor = predictor_name,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn predict_with_timeout<T, Fut>(
        predictor_name: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, KronosError>
    where
        Fut: core::future::Future<Output = Result<T, KronosError>>,
    {
        if let Ok(res) = tokio::time::timeout(timeout, fut).await {
            res
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!(predictor = predictor_name, "prediction deadline elapsed");
            Err(KronosError::prediction_timeout(
                predictor_name,
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ))
        }
    }
}
