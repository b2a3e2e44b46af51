use kronos_core::{
    GenerateRequest, GenerationParams, PriceWindow, assemble_chart, evaluate, parse_datetime_str,
    slice_windows, target_timestamps,
};
use kronos_types::{KronosError, PredictionRequest, PredictionRequestBuilder, Resource};

use crate::core::tag_err;
use crate::{Kronos, PredictionMetadata, PredictionResult, SamplingParameters, TargetSource};

impl Kronos {
    /// Start a prediction request seeded from the configured defaults.
    #[must_use]
    pub fn request(&self) -> PredictionRequestBuilder {
        PredictionRequestBuilder::from_defaults(self.cfg.prediction_defaults)
    }

    /// Forecast the rows following the lookback window of the current dataset.
    ///
    /// The lookback is rows `[0, lookback)`; the horizon is
    /// `[lookback, lookback + pred_len)`. Target timestamps come from the
    /// horizon and are extrapolated from the lookback's cadence when the
    /// dataset ends early. Metrics and the chart's `actual` series are only
    /// filled when the dataset is strictly longer than `lookback + pred_len`.
    ///
    /// The state read guard is held for the whole call, so concurrent loads
    /// wait. Calls on the same predictor are serialized, and inference is
    /// bounded by the configured `prediction_timeout`.
    ///
    /// # Errors
    /// - `NotReady(model)`, then `NotReady(data)`, when inputs are missing.
    /// - `InvalidArg` for an unparsable `start_date`.
    /// - `Prediction` when the lookback is empty, targets cannot be
    ///   extrapolated, the predictor fails, or it returns the wrong number of rows.
    /// - `PredictionTimeout` when the deadline elapses.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "kronos::predict::run_prediction",
            skip(self, request),
            fields(
                lookback = request.lookback(),
                pred_len = request.pred_len(),
            ),
            err,
        )
    )]
    pub async fn run_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, KronosError> {
        let state = self.state.read().await;
        let model = state
            .model
            .as_ref()
            .ok_or(KronosError::not_ready(Resource::Model))?;
        let table = state
            .dataset
            .as_ref()
            .ok_or(KronosError::not_ready(Resource::Data))?;

        if let Some(date) = request.start_date()
            && parse_datetime_str(date).is_none()
        {
            return Err(KronosError::InvalidArg(format!(
                "unparsable start_date: {date:?}"
            )));
        }

        let lookback = request.lookback() as usize;
        let pred_len = request.pred_len() as usize;
        let split = slice_windows(table, lookback, pred_len);
        if split.lookback.is_empty() {
            return Err(KronosError::Prediction("dataset has no rows".to_string()));
        }
        #[cfg(feature = "tracing")]
        if split.lookback.len() > model.spec.context_length {
            tracing::debug!(
                lookback = split.lookback.len(),
                context_length = model.spec.context_length,
                "lookback exceeds model context; predictor truncates"
            );
        }

        let known = split.horizon.timestamps();
        let targets = target_timestamps(split.lookback.timestamps(), known, pred_len)
            .ok_or_else(|| {
                KronosError::Prediction(
                    "cannot extrapolate target timestamps: lookback has no regular step"
                        .to_string(),
                )
            })?;
        let target_source = if known.len() >= pred_len {
            TargetSource::Dataset
        } else if known.is_empty() {
            TargetSource::Extrapolated
        } else {
            TargetSource::Mixed
        };
        let expected = targets.len();

        let gen_req = GenerateRequest {
            window: PriceWindow::from(&split.lookback),
            input_times: split.lookback.timestamps().to_vec(),
            target_times: targets,
            params: GenerationParams::from(request),
        };

        let name = model.predictor.name();
        let forecast = {
            let _gate = model.gate.lock().await;
            Self::predict_with_timeout(
                name,
                self.cfg.prediction_timeout,
                model.predictor.generate(gen_req),
            )
            .await
            .map_err(|e| tag_err(name, e))?
        };
        if forecast.len() != expected {
            return Err(KronosError::Prediction(format!(
                "{name}: returned {} rows, expected {expected}",
                forecast.len()
            )));
        }

        let ground_truth = split.ground_truth();
        let metrics = evaluate(&forecast, ground_truth);
        let chart = assemble_chart(&split, &forecast);
        let metadata = PredictionMetadata {
            model: model.spec.key,
            device: model.device,
            parameters: SamplingParameters {
                temperature: request.temperature(),
                top_p: request.top_p(),
                sample_count: request.sample_count(),
            },
            lookback: split.lookback.len(),
            pred_len,
            start_date: request.start_date().map(str::to_string),
            target_source,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            rows = forecast.len(),
            has_ground_truth = split.has_ground_truth,
            "prediction complete"
        );

        Ok(PredictionResult {
            forecast,
            actual: ground_truth.map(|v| v.to_rows()),
            metrics,
            chart,
            metadata,
        })
    }
}
