mod common;
use kronos::{ColumnHints, Kronos};
use common::{get_loader, init_tracing, sample_table};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // 1. Build the orchestrator around a predictor loader.
    let kronos = Kronos::builder().loader(get_loader()).build()?;

    // 2. Load a dataset. Columns are matched by name and validated.
    let info = kronos
        .load_table(sample_table(600), &ColumnHints::new())
        .await?;
    println!(
        "Loaded {} rows ({}), {} .. {}",
        info.rows,
        info.timeframe,
        info.start_date.as_deref().unwrap_or("?"),
        info.end_date.as_deref().unwrap_or("?"),
    );

    // 3. Load a model from the catalog.
    let model = kronos.load_predictor("kronos-small", Some("cpu")).await?;
    println!("Model: {} on {}", model.spec.name, model.device);

    // 4. Forecast 48 bars after a 400 bar lookback. The dataset is long enough
    //    to hold ground truth, so metrics are filled in.
    let request = kronos.request().lookback(400).pred_len(48).build()?;
    let result = kronos.run_prediction(&request).await?;

    if let Some(m) = result.metrics {
        println!("MAE {:.4}  RMSE {:.4}  MAPE {:?}", m.mae, m.rmse, m.mape);
    }
    for row in result.forecast.rows().take(5) {
        println!("{}  close={:.3}", row.timestamp, row.close);
    }
    Ok(())
}
