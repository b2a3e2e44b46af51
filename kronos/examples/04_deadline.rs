mod common;
use std::sync::Arc;
use std::time::Duration;

use kronos::{ColumnHints, Kronos};
use kronos_mock::{DynamicMockPredictor, MockBehavior, MockLoader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    // A predictor that never answers.
    let (predictor, controller) = DynamicMockPredictor::new_with_controller("stalled");
    controller.set_behavior(MockBehavior::Hang).await;

    let kronos = Kronos::builder()
        .loader(Arc::new(MockLoader::new().with_predictor(predictor)))
        .prediction_timeout(Duration::from_millis(250))
        .build()?;
    kronos
        .load_table(common::sample_table(200), &ColumnHints::new())
        .await?;
    kronos.load_predictor("kronos-mini", None).await?;

    let request = kronos.request().lookback(100).pred_len(10).build()?;
    match kronos.run_prediction(&request).await {
        Ok(_) => println!("unexpectedly finished"),
        Err(e) => println!("{e}"),
    }

    // The state lock was released; loads proceed immediately.
    let info = kronos
        .load_table(common::sample_table(300), &ColumnHints::new())
        .await?;
    println!("reloaded {} rows", info.rows);
    Ok(())
}
