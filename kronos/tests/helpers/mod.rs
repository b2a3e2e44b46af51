#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use kronos::{ColumnHints, Kronos, PredictionRequest, RawTable};
use kronos_mock::{DynamicMockController, DynamicMockPredictor, MockLoader};

/// Name the dynamic predictor reports.
pub const P0: &str = "P0";

/// Construct a UTC `DateTime` from components for readability in tests.
pub fn dt(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> DateTime<Utc> {
    let date = chrono::NaiveDate::from_ymd_opt(y, m, d).expect("invalid date");
    let naive = date.and_hms_opt(hh, mm, ss).expect("invalid time components");
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
}

/// First timestamp of every fixture table.
pub fn t0() -> DateTime<Utc> {
    dt(2024, 3, 1, 0, 0, 0)
}

/// `n` hourly rows starting at [`t0`] with `close = base + i`.
pub fn hourly_table_from(n: usize, base: f64) -> RawTable {
    let ts: Vec<DateTime<Utc>> = (0..n)
        .map(|i| t0() + TimeDelta::hours(i as i64))
        .collect();
    let close: Vec<f64> = (0..n).map(|i| base + i as f64).collect();
    RawTable::new()
        .with_column("timestamps", ts)
        .unwrap()
        .with_column("open", close.clone())
        .unwrap()
        .with_column("high", close.iter().map(|c| c + 1.0))
        .unwrap()
        .with_column("low", close.iter().map(|c| c - 1.0))
        .unwrap()
        .with_column("close", close)
        .unwrap()
}

/// `n` hourly rows with closes `100, 101, ...`.
pub fn hourly_table(n: usize) -> RawTable {
    hourly_table_from(n, 100.0)
}

/// Orchestrator over the given loader with a short deadline.
pub fn kronos_with(loader: MockLoader) -> Kronos {
    Kronos::builder()
        .loader(Arc::new(loader))
        .prediction_timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

/// Orchestrator whose loader hands out a controllable predictor.
pub fn kronos_dynamic() -> (Kronos, DynamicMockController, MockLoader) {
    let (predictor, controller) = DynamicMockPredictor::new_with_controller(P0);
    let loader = MockLoader::new().with_predictor(predictor);
    (kronos_with(loader.clone()), controller, loader)
}

/// Orchestrator with `rows` hourly rows and `kronos-small` loaded.
pub async fn ready(rows: usize) -> (Kronos, DynamicMockController) {
    let (kronos, controller, _) = kronos_dynamic();
    kronos
        .load_table(hourly_table(rows), &ColumnHints::new())
        .await
        .unwrap();
    kronos.load_predictor("kronos-small", None).await.unwrap();
    (kronos, controller)
}

/// Request with the given window sizes and default sampling.
pub fn request(lookback: u32, pred_len: u32) -> PredictionRequest {
    PredictionRequest::builder()
        .lookback(lookback)
        .pred_len(pred_len)
        .build()
        .unwrap()
}
