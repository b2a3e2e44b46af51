use std::time::Duration;

use kronos::{ColumnHints, ErrorKind, KronosError};
use kronos_mock::MockBehavior;

use crate::helpers::{P0, hourly_table, ready, request};

#[tokio::test(start_paused = true)]
async fn hanging_predictor_times_out() {
    let (kronos, controller) = ready(20).await;
    controller.set_behavior(MockBehavior::Hang).await;

    let err = kronos.run_prediction(&request(10, 5)).await.unwrap_err();
    match &err {
        KronosError::PredictionTimeout { model, timeout_ms } => {
            assert_eq!(model, P0);
            assert_eq!(*timeout_ms, 2000);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Prediction);
    assert_eq!(controller.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn timeout_releases_state_for_loads() {
    let (kronos, controller) = ready(20).await;
    controller.set_behavior(MockBehavior::Hang).await;
    assert!(kronos.run_prediction(&request(10, 5)).await.is_err());

    let load = tokio::time::timeout(
        Duration::from_millis(10),
        kronos.load_table(hourly_table(30), &ColumnHints::new()),
    )
    .await
    .expect("load must not wait on a timed-out prediction")
    .unwrap();
    assert_eq!(load.rows, 30);

    tokio::time::timeout(
        Duration::from_millis(10),
        kronos.load_predictor("kronos-base", None),
    )
    .await
    .expect("model load must not wait on a timed-out prediction")
    .unwrap();
}

#[tokio::test(start_paused = true)]
async fn slow_predictor_within_deadline_succeeds() {
    let (kronos, controller) = ready(20).await;
    controller.set_delay(Duration::from_millis(1500)).await;
    let result = kronos.run_prediction(&request(10, 5)).await.unwrap();
    assert_eq!(result.forecast.len(), 5);
}
