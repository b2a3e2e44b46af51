mod common;
#[cfg(feature = "dataframe")]
use kronos::Kronos;

#[cfg(feature = "dataframe")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("btc_1h.csv");
    let mut csv = String::from("timestamps,open,high,low,close,volume\n");
    for i in 0..200u32 {
        let c = 42_000.0 + f64::from(i % 24) * 35.0;
        csv.push_str(&format!(
            "2024-02-{:02} {:02}:00:00,{c},{},{},{c},{}\n",
            1 + i / 24,
            i % 24,
            c + 20.0,
            c - 20.0,
            10 + i % 7
        ));
    }
    std::fs::write(&path, csv)?;

    let kronos = Kronos::builder()
        .loader(common::get_loader())
        .data_dir(dir.path())
        .build()?;

    for file in kronos.list_data_files()? {
        println!("{} ({} bytes)", file.name, file.size);
    }
    let info = kronos.load_file(&path).await?;
    println!("{} rows, timeframe {}", info.rows, info.timeframe);

    kronos.load_predictor("kronos-mini", None).await?;
    let request = kronos.request().lookback(150).pred_len(24).build()?;
    let result = kronos.run_prediction(&request).await?;
    println!("{}", serde_json::to_string_pretty(&result.metrics)?);
    Ok(())
}

#[cfg(not(feature = "dataframe"))]
fn main() {
    eprintln!("This example requires the 'dataframe' feature. Skipping.");
}
