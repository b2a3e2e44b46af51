use chrono::TimeDelta;
use kronos::{
    ColumnHints, ErrorKind, ForecastTable, KronosError, PredictionRequest, Resource, TargetSource,
    tag_err,
};
use kronos_mock::{MockBehavior, MockLoader};

use crate::helpers::{hourly_table, kronos_dynamic, kronos_with, ready, request, t0};

#[tokio::test]
async fn model_is_checked_before_data() {
    let kronos = kronos_with(MockLoader::new());
    let err = kronos.run_prediction(&request(10, 5)).await.unwrap_err();
    assert!(matches!(
        err,
        KronosError::NotReady {
            resource: Resource::Model
        }
    ));

    kronos.load_predictor("kronos-small", None).await.unwrap();
    let err = kronos.run_prediction(&request(10, 5)).await.unwrap_err();
    assert!(matches!(
        err,
        KronosError::NotReady {
            resource: Resource::Data
        }
    ));
}

#[tokio::test]
async fn data_without_model_is_not_ready() {
    let kronos = kronos_with(MockLoader::new());
    kronos
        .load_table(hourly_table(20), &ColumnHints::new())
        .await
        .unwrap();
    let err = kronos.run_prediction(&request(10, 5)).await.unwrap_err();
    assert!(matches!(
        err,
        KronosError::NotReady {
            resource: Resource::Model
        }
    ));
}

#[tokio::test]
async fn exact_fit_has_no_ground_truth() {
    let (kronos, _controller) = ready(15).await;
    let result = kronos.run_prediction(&request(10, 5)).await.unwrap();

    assert_eq!(result.forecast.len(), 5);
    assert!(result.metrics.is_none());
    assert!(result.actual.is_none());
    assert!(result.chart.actual.is_empty());
    assert_eq!(result.chart.historical.len(), 10);
    assert_eq!(result.chart.predictions.len(), 5);
    assert_eq!(result.metadata.target_source, TargetSource::Dataset);
}

#[tokio::test]
async fn one_extra_row_enables_metrics() {
    let (kronos, _controller) = ready(16).await;
    let result = kronos.run_prediction(&request(10, 5)).await.unwrap();

    // flat forecast at 109 against actual closes 110..=114
    let metrics = result.metrics.unwrap();
    assert!((metrics.mae - 3.0).abs() < 1e-12);
    assert!((metrics.rmse - 11.0_f64.sqrt()).abs() < 1e-12);
    assert!(metrics.mape.unwrap() > 0.0);

    let actual = result.actual.unwrap();
    let closes: Vec<f64> = actual.iter().map(|r| r.close).collect();
    assert_eq!(closes, vec![110.0, 111.0, 112.0, 113.0, 114.0]);
    assert_eq!(result.chart.actual, actual);
}

#[tokio::test]
async fn predictor_sees_lookback_and_horizon_timestamps() {
    let (kronos, controller) = ready(30).await;
    let req = PredictionRequest::builder()
        .lookback(10)
        .pred_len(5)
        .temperature(0.5)
        .top_p(0.8)
        .sample_count(3)
        .build()
        .unwrap();
    let result = kronos.run_prediction(&req).await.unwrap();

    let requests = controller.requests().await;
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert_eq!(sent.window.len(), 10);
    assert_eq!(sent.window.close[0], 100.0);
    assert_eq!(sent.window.close[9], 109.0);
    assert_eq!(sent.input_times.len(), 10);
    assert_eq!(sent.target_times[0], t0() + TimeDelta::hours(10));
    assert_eq!(sent.params.pred_len, 5);
    assert_eq!(sent.params.temperature, 0.5);
    assert_eq!(sent.params.sample_count, 3);

    assert_eq!(result.forecast.timestamps(), sent.target_times.as_slice());
    assert_eq!(result.metadata.parameters.top_p, 0.8);
    assert_eq!(result.metadata.parameters.sample_count, 3);
}

#[tokio::test]
async fn short_horizon_is_extended_from_lookback_cadence() {
    let (kronos, controller) = ready(12).await;
    let result = kronos.run_prediction(&request(10, 5)).await.unwrap();

    let expected: Vec<_> = (10..15).map(|h| t0() + TimeDelta::hours(h)).collect();
    assert_eq!(controller.requests().await[0].target_times, expected);
    assert_eq!(result.metadata.target_source, TargetSource::Mixed);
    assert!(result.metrics.is_none());
}

#[tokio::test]
async fn lookback_longer_than_dataset_is_clamped() {
    let (kronos, controller) = ready(8).await;
    let result = kronos.run_prediction(&request(10, 3)).await.unwrap();

    assert_eq!(result.metadata.lookback, 8);
    assert_eq!(result.metadata.pred_len, 3);
    assert_eq!(result.metadata.target_source, TargetSource::Extrapolated);
    assert_eq!(
        controller.requests().await[0].target_times[0],
        t0() + TimeDelta::hours(8)
    );
}

#[tokio::test]
async fn single_row_cannot_be_extrapolated() {
    let (kronos, controller) = ready(1).await;
    let err = kronos.run_prediction(&request(1, 3)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Prediction);
    assert_eq!(controller.call_count().await, 0);
}

#[tokio::test]
async fn wrong_forecast_length_is_rejected() {
    let (kronos, controller) = ready(20).await;
    controller
        .set_behavior(MockBehavior::Return(ForecastTable::default()))
        .await;
    let err = kronos.run_prediction(&request(10, 5)).await.unwrap_err();
    assert!(matches!(err, KronosError::Prediction(ref m) if m.contains("returned 0 rows")));
}

#[tokio::test]
async fn predictor_failures_are_attributed() {
    let (kronos, controller) = ready(20).await;
    controller
        .set_behavior(MockBehavior::Fail(KronosError::Prediction("boom".into())))
        .await;
    let err = kronos.run_prediction(&request(10, 5)).await.unwrap_err();
    assert!(matches!(err, KronosError::Prediction(ref m) if m == "P0: boom"));

    // a failed prediction leaves the orchestrator usable
    controller.set_behavior(MockBehavior::Flat).await;
    assert!(kronos.run_prediction(&request(10, 5)).await.is_ok());
}

#[test]
fn tag_err_wraps_foreign_errors_only() {
    let io = tag_err("P0", KronosError::Io("disk".into()));
    assert!(matches!(io, KronosError::Prediction(ref m) if m == "P0: io error: disk"));

    let timeout = tag_err("P0", KronosError::prediction_timeout("P0", 10));
    assert!(matches!(timeout, KronosError::PredictionTimeout { .. }));

    let invalid = tag_err("P0", KronosError::InvalidArg("x".into()));
    assert!(matches!(invalid, KronosError::InvalidArg(_)));
}

#[tokio::test]
async fn start_date_is_validated_and_echoed() {
    let (kronos, _controller) = ready(20).await;

    let bad = PredictionRequest::builder()
        .lookback(10)
        .pred_len(5)
        .start_date("next tuesday")
        .build()
        .unwrap();
    let err = kronos.run_prediction(&bad).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let good = PredictionRequest::builder()
        .lookback(10)
        .pred_len(5)
        .start_date("2024-03-01")
        .build()
        .unwrap();
    let result = kronos.run_prediction(&good).await.unwrap();
    assert_eq!(result.metadata.start_date.as_deref(), Some("2024-03-01"));
    assert_eq!(result.chart.historical[0].timestamp, t0());
}

#[tokio::test]
async fn metadata_reflects_loaded_model() {
    let (kronos, _controller, _) = kronos_dynamic();
    kronos
        .load_table(hourly_table(20), &ColumnHints::new())
        .await
        .unwrap();
    kronos
        .load_predictor("kronos-mini", Some("mps"))
        .await
        .unwrap();
    let result = kronos.run_prediction(&request(10, 5)).await.unwrap();
    assert_eq!(result.metadata.model, kronos::ModelKey::KronosMini);
    assert_eq!(result.metadata.device, kronos::Device::Mps);
}

#[tokio::test]
async fn builtin_mock_predictor_is_deterministic() {
    let kronos = kronos_with(MockLoader::new());
    kronos
        .load_table(hourly_table(40), &ColumnHints::new())
        .await
        .unwrap();
    kronos.load_predictor("kronos-small", None).await.unwrap();

    let first = kronos.run_prediction(&request(20, 10)).await.unwrap();
    let second = kronos.run_prediction(&request(20, 10)).await.unwrap();
    assert_eq!(first.forecast, second.forecast);
    assert!(first.metrics.is_some());
}
