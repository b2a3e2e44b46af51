use std::sync::Arc;
use std::time::Duration;

use kronos::ColumnHints;

use crate::helpers::{hourly_table_from, ready, request};

#[tokio::test(start_paused = true)]
async fn load_waits_for_in_flight_prediction() {
    let (kronos, controller) = ready(20).await;
    controller.set_delay(Duration::from_millis(100)).await;
    let kronos = Arc::new(kronos);

    let runner = Arc::clone(&kronos);
    let prediction = tokio::spawn(async move { runner.run_prediction(&request(10, 5)).await });
    while controller.in_flight() == 0 {
        tokio::task::yield_now().await;
    }

    let info = kronos
        .load_table(hourly_table_from(50, 500.0), &ColumnHints::new())
        .await
        .unwrap();
    assert_eq!(info.rows, 50);
    assert!(prediction.is_finished());

    // the in-flight prediction saw the dataset it started with
    let result = prediction.await.unwrap().unwrap();
    assert_eq!(result.chart.historical[0].close, 100.0);
    assert_eq!(kronos.data_info().await.unwrap().rows, 50);
}

#[tokio::test(start_paused = true)]
async fn model_swap_waits_for_in_flight_prediction() {
    let (kronos, controller) = ready(20).await;
    controller.set_delay(Duration::from_millis(100)).await;
    let kronos = Arc::new(kronos);

    let runner = Arc::clone(&kronos);
    let prediction = tokio::spawn(async move { runner.run_prediction(&request(10, 5)).await });
    while controller.in_flight() == 0 {
        tokio::task::yield_now().await;
    }

    kronos.load_predictor("kronos-base", None).await.unwrap();
    let result = prediction.await.unwrap().unwrap();
    assert_eq!(result.metadata.model, kronos::ModelKey::KronosSmall);
}

#[tokio::test(start_paused = true)]
async fn predictions_on_one_predictor_are_serialized() {
    let (kronos, controller) = ready(20).await;
    controller.set_delay(Duration::from_millis(50)).await;

    let req = request(10, 5);
    let (a, b, c) = tokio::join!(
        kronos.run_prediction(&req),
        kronos.run_prediction(&req),
        kronos.run_prediction(&req),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(controller.call_count().await, 3);
    assert_eq!(controller.peak_concurrency(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_readers_and_writers_stay_consistent() {
    let (kronos, _controller) = ready(20).await;
    let kronos = Arc::new(kronos);

    let mut tasks = Vec::new();
    for i in 0..8 {
        let k = Arc::clone(&kronos);
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                let rows = 20 + i;
                k.load_table(hourly_table_from(rows, 100.0), &ColumnHints::new())
                    .await
                    .map(|_| ())
            } else {
                k.run_prediction(&request(10, 5)).await.map(|r| {
                    assert_eq!(r.forecast.len(), 5);
                })
            }
        }));
    }
    for t in tasks {
        t.await.unwrap().unwrap();
    }
    assert!(kronos.has_data().await);
}
