mod common;
use kronos::Kronos;
use common::get_loader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let kronos = Kronos::builder().loader(get_loader()).build()?;

    for spec in kronos.available_models() {
        println!(
            "{:<14} {:<24} ctx={:<5} params={:<7} {}",
            spec.key.as_str(), spec.model_id, spec.context_length, spec.params, spec.description
        );
    }

    // Unknown keys are rejected before the loader is consulted.
    match kronos.load_predictor("kronos-large", None).await {
        Ok(_) => println!("unexpectedly loaded"),
        Err(e) => println!("{} ({})", e, e.kind()),
    }
    Ok(())
}
