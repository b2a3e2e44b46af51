use proptest::prelude::*;

use kronos::TargetSource;

use crate::helpers::{ready, request};

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn ground_truth_requires_a_row_past_the_horizon(
        rows in 2usize..40,
        lookback in 2u32..24,
        pred_len in 1u32..12,
    ) {
        tokio_test::block_on(async move {
            let (kronos, controller) = ready(rows).await;
            let result = kronos.run_prediction(&request(lookback, pred_len)).await.unwrap();

            let l = (lookback as usize).min(rows);
            let p = pred_len as usize;
            let strict = rows > l + p;
            assert_eq!(result.metrics.is_some(), strict);
            assert_eq!(result.actual.is_some(), strict);
            assert_eq!(result.chart.actual.len(), if strict { p } else { 0 });
            assert_eq!(result.forecast.len(), p);
            assert_eq!(result.chart.historical.len(), l);
            assert_eq!(result.metadata.lookback, l);

            let known = rows.saturating_sub(l).min(p);
            let source = match known {
                0 => TargetSource::Extrapolated,
                k if k == p => TargetSource::Dataset,
                _ => TargetSource::Mixed,
            };
            assert_eq!(result.metadata.target_source, source);

            let sent = &controller.requests().await[0];
            assert!(sent.target_times.windows(2).all(|w| w[0] < w[1]));
            assert!(sent.input_times.last() < sent.target_times.first());
        });
    }
}
