use std::sync::Arc;

use kronos_types::{Device, KronosError, ModelKey, ModelSpec};
use tokio::sync::Mutex;

use crate::core::ActiveModel;
use crate::{Kronos, LoadedModel};

impl ActiveModel {
    fn describe(&self) -> LoadedModel {
        LoadedModel {
            spec: self.spec,
            device: self.device,
            predictor: self.predictor.name().to_string(),
        }
    }
}

impl Kronos {
    /// Catalog of models that can be passed to [`load_predictor`](Self::load_predictor).
    #[must_use]
    pub fn available_models(&self) -> Vec<ModelSpec> {
        ModelKey::ALL.iter().map(|k| k.spec()).collect()
    }

    /// Construct the predictor for `model_key` and make it current.
    ///
    /// `device` defaults to the configured device. Construction runs outside
    /// the state lock; the previous predictor is replaced only on success.
    ///
    /// # Errors
    /// - `UnknownModel` for a key missing from the catalog.
    /// - `Load` for an unparsable device or a failed construction.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "kronos::model::load_predictor",
            skip(self),
            err,
        )
    )]
    pub async fn load_predictor(
        &self,
        model_key: &str,
        device: Option<&str>,
    ) -> Result<LoadedModel, KronosError> {
        let key: ModelKey = model_key.parse()?;
        let device = match device {
            Some(d) => d.parse::<Device>()?,
            None => self.cfg.default_device,
        };
        let spec = key.spec();

        let predictor = self.loader.load(&spec, device).await.map_err(|e| match e {
            e @ (KronosError::Load(_) | KronosError::UnknownModel { .. }) => e,
            other => KronosError::Load(format!("{}: {other}", spec.model_id)),
        })?;

        let active = Arc::new(ActiveModel {
            spec,
            device,
            predictor,
            gate: Mutex::new(()),
        });
        let loaded = active.describe();
        self.state.write().await.model = Some(active);

        #[cfg(feature = "tracing")]
        tracing::info!(model = %key, device = %device, "model loaded");
        Ok(loaded)
    }

    /// The predictor currently loaded, if any.
    pub async fn current_model(&self) -> Option<LoadedModel> {
        self.state.read().await.model.as_ref().map(|m| m.describe())
    }

    /// Returns true once a predictor has been loaded.
    pub async fn is_model_loaded(&self) -> bool {
        self.state.read().await.model.is_some()
    }

    /// Release the current predictor.
    ///
    /// Waits for in-flight predictions. Returns the model that was unloaded.
    pub async fn unload(&self) -> Option<LoadedModel> {
        let prev = self.state.write().await.model.take();
        #[cfg(feature = "tracing")]
        if let Some(m) = &prev {
            tracing::info!(model = %m.spec.key, "model unloaded");
        }
        prev.map(|m| m.describe())
    }
}
