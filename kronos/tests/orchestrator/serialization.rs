use kronos::PredictionResult;
use serde_json::{Value, json};

use crate::helpers::{ready, request};

#[tokio::test]
async fn absent_metrics_serialize_as_empty_object() {
    let (kronos, _controller) = ready(15).await;
    let result = kronos.run_prediction(&request(10, 5)).await.unwrap();
    let v = serde_json::to_value(&result).unwrap();

    assert_eq!(v["metrics"], json!({}));
    assert_eq!(v["actual"], Value::Null);
    assert_eq!(v["chart"]["actual"], json!([]));
    assert_eq!(v["forecast"].as_array().unwrap().len(), 5);
    assert_eq!(v["metadata"]["model"], "kronos-small");
    assert_eq!(v["metadata"]["device"], "cpu");
    assert_eq!(v["metadata"]["target_source"], "dataset");
    assert_eq!(v["metadata"]["parameters"]["top_p"], 0.9);
    assert!(v["metadata"].get("start_date").is_none());
}

#[tokio::test]
async fn forecast_rows_carry_every_field() {
    let (kronos, _controller) = ready(16).await;
    let result = kronos.run_prediction(&request(10, 5)).await.unwrap();
    let v = serde_json::to_value(&result).unwrap();

    let first = &v["forecast"][0];
    for key in ["timestamp", "open", "high", "low", "close", "volume", "amount"] {
        assert!(first.get(key).is_some(), "missing {key}");
    }
    assert_eq!(first["timestamp"], "2024-03-01T10:00:00Z");
    assert_eq!(first["close"], 109.0);
    assert!(v["metrics"]["mae"].is_number());
    assert_eq!(v["actual"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn result_round_trips_through_json() {
    let (kronos, _controller) = ready(16).await;
    let result = kronos.run_prediction(&request(10, 5)).await.unwrap();
    let text = serde_json::to_string(&result).unwrap();
    let back: PredictionResult = serde_json::from_str(&text).unwrap();
    assert_eq!(back, result);
}
