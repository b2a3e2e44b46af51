//! Forecast accuracy metrics over closing prices.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::table::{ForecastTable, TableView};

/// Accuracy of a forecast against ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean absolute error.
    pub mae: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute percentage error (×100) over rows with a non-zero actual.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mape: Option<f64>,
}

/// Compute MAE, RMSE and MAPE over positionally aligned closes.
///
/// Pairs are formed up to the shorter input. Returns `None` when there are no
/// pairs. Rows whose actual is exactly `0.0` are left out of MAPE only.
///
/// ```
/// use kronos_core::compute_metrics;
///
/// let m = compute_metrics(&[1.0, 2.0], &[2.0, 2.0]).unwrap();
/// assert_eq!(m.mae, 0.5);
/// assert_eq!(m.mape, Some(25.0));
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_metrics(predicted: &[f64], actual: &[f64]) -> Option<Metrics> {
    let n = predicted.len().min(actual.len());
    if n == 0 {
        return None;
    }
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut pct_sum = 0.0;
    let mut pct_n = 0usize;
    for (p, a) in predicted.iter().zip(actual) {
        let err = p - a;
        abs_sum += err.abs();
        sq_sum += err * err;
        if *a != 0.0 {
            pct_sum += (err / a).abs();
            pct_n += 1;
        }
    }
    let len = n as f64;
    Some(Metrics {
        mae: abs_sum / len,
        rmse: (sq_sum / len).sqrt(),
        mape: (pct_n > 0).then(|| pct_sum / pct_n as f64 * 100.0),
    })
}

/// Metrics for a forecast, or `None` when ground truth is absent.
#[must_use]
pub fn evaluate(forecast: &ForecastTable, ground_truth: Option<TableView<'_>>) -> Option<Metrics> {
    ground_truth.and_then(|truth| compute_metrics(forecast.close(), truth.close()))
}

/// Serde adapter that writes absent metrics as an empty object.
///
/// Use with `#[serde(with = "kronos_core::metrics::empty_object")]` on an
/// `Option<Metrics>` field.
pub mod empty_object {
    use super::{Deserialize, Deserializer, Metrics, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Empty {}

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeMetrics {
        Full(Metrics),
        Empty(Empty),
    }

    /// Serialize `None` as `{}`.
    ///
    /// # Errors
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Option<Metrics>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(m) => m.serialize(serializer),
            None => Empty {}.serialize(serializer),
        }
    }

    /// Deserialize `{}` as `None`.
    ///
    /// # Errors
    /// Propagates deserializer errors.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Metrics>, D::Error> {
        Ok(match MaybeMetrics::deserialize(deserializer)? {
            MaybeMetrics::Full(m) => Some(m),
            MaybeMetrics::Empty(_) => None,
        })
    }
}
