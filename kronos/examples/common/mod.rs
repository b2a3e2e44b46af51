#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use kronos::{PredictorLoader, RawTable};
use tracing_subscriber::EnvFilter;

#[must_use]
pub fn get_loader() -> Arc<dyn PredictorLoader> {
    // No model runtime ships with this crate; the mock loader stands in.
    println!("--- (Using mock predictor loader) ---");
    Arc::new(kronos_mock::MockLoader::new())
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Synthetic 15-minute bars with a slow oscillation around 100.
#[must_use]
pub fn sample_table(rows: usize) -> RawTable {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
    let mut ts = Vec::with_capacity(rows);
    let mut open = Vec::with_capacity(rows);
    let mut high = Vec::with_capacity(rows);
    let mut low = Vec::with_capacity(rows);
    let mut close = Vec::with_capacity(rows);
    let mut volume = Vec::with_capacity(rows);
    let mut prev = 100.0_f64;
    for i in 0..rows {
        let x = i as f64 / 12.0;
        let c = 100.0 + 4.0 * x.sin() + 0.05 * i as f64;
        ts.push(start + TimeDelta::minutes(15 * i as i64));
        open.push(prev);
        high.push(prev.max(c) + 0.25);
        low.push(prev.min(c) - 0.25);
        close.push(c);
        volume.push(1_000.0 + 50.0 * (x * 3.0).cos());
        prev = c;
    }
    RawTable::new()
        .with_column("timestamps", ts)
        .and_then(|t| t.with_column("open", open))
        .and_then(|t| t.with_column("high", high))
        .and_then(|t| t.with_column("low", low))
        .and_then(|t| t.with_column("close", close))
        .and_then(|t| t.with_column("volume", volume))
        .expect("columns have equal length")
}
