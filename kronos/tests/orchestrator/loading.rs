use std::sync::Arc;

use async_trait::async_trait;
use kronos::{
    ColumnHints, Device, ErrorKind, Kronos, KronosError, ModelKey, ModelSpec, Predictor,
    PredictorLoader, RawTable, Resource, Timeframe,
};
use kronos_mock::MockLoader;

use crate::helpers::{hourly_table, kronos_dynamic, kronos_with};

#[tokio::test]
async fn load_table_reports_summary() {
    let kronos = kronos_with(MockLoader::new());
    assert!(!kronos.has_data().await);

    let info = kronos
        .load_table(hourly_table(24), &ColumnHints::new())
        .await
        .unwrap();
    assert_eq!(info.rows, 24);
    assert_eq!(info.timeframe, "1 hours");
    assert_eq!(info.start_date.as_deref(), Some("2024-03-01T00:00:00Z"));
    assert!(kronos.has_data().await);
    assert_eq!(kronos.data_info().await.unwrap(), info);
    assert_eq!(kronos.detect_timeframe().await.unwrap(), Timeframe::Hours(1));
}

#[tokio::test]
async fn data_queries_before_load_are_not_ready() {
    let kronos = kronos_with(MockLoader::new());
    let err = kronos.data_info().await.unwrap_err();
    assert!(matches!(
        err,
        KronosError::NotReady {
            resource: Resource::Data
        }
    ));
    assert!(err.is_recoverable());
    assert!(kronos.detect_timeframe().await.is_err());
}

#[tokio::test]
async fn failed_normalization_keeps_previous_dataset() {
    let kronos = kronos_with(MockLoader::new());
    kronos
        .load_table(hourly_table(10), &ColumnHints::new())
        .await
        .unwrap();

    let no_close = RawTable::new()
        .with_column("open", [1.0, 2.0])
        .unwrap()
        .with_column("high", [1.0, 2.0])
        .unwrap()
        .with_column("low", [1.0, 2.0])
        .unwrap();
    let err = kronos
        .load_table(no_close, &ColumnHints::new())
        .await
        .unwrap_err();
    assert!(matches!(err, KronosError::MissingColumns(_)));
    assert_eq!(kronos.data_info().await.unwrap().rows, 10);
}

#[tokio::test]
async fn hints_rename_columns_before_validation() {
    let kronos = kronos_with(MockLoader::new());
    let raw = RawTable::new()
        .with_column("Open", [1.0, 2.0, 3.0])
        .unwrap()
        .with_column("High", [1.5, 2.5, 3.5])
        .unwrap()
        .with_column("Low", [0.5, 1.5, 2.5])
        .unwrap()
        .with_column("Close", [1.2, 2.2, 3.2])
        .unwrap();
    let hints = ColumnHints::new()
        .rename("Open", "open")
        .rename("High", "high")
        .rename("Low", "low")
        .rename("Close", "close");
    let info = kronos.load_table(raw, &hints).await.unwrap();
    assert_eq!(info.rows, 3);
    assert_eq!(info.timeframe, "1 hours");
}

#[tokio::test]
async fn load_predictor_resolves_catalog_and_device() {
    let loader = MockLoader::new();
    let kronos = kronos_with(loader.clone());

    let loaded = kronos
        .load_predictor("kronos-base", Some("cuda:1"))
        .await
        .unwrap();
    assert_eq!(loaded.key(), ModelKey::KronosBase);
    assert_eq!(loaded.device, Device::Cuda(Some(1)));
    assert_eq!(loaded.spec.context_length, 512);

    kronos.load_predictor("kronos-mini", None).await.unwrap();
    assert_eq!(
        loader.loads().await,
        vec![
            (ModelKey::KronosBase, Device::Cuda(Some(1))),
            (ModelKey::KronosMini, Device::Cpu),
        ]
    );
    assert_eq!(
        kronos.current_model().await.unwrap().key(),
        ModelKey::KronosMini
    );
}

#[tokio::test]
async fn unknown_model_is_a_load_error() {
    let loader = MockLoader::new();
    let kronos = kronos_with(loader.clone());
    let err = kronos.load_predictor("kronos-xl", None).await.unwrap_err();
    assert!(matches!(err, KronosError::UnknownModel { ref key } if key == "kronos-xl"));
    assert_eq!(err.kind(), ErrorKind::Load);
    assert!(!kronos.is_model_loaded().await);
    assert!(loader.loads().await.is_empty());
}

#[tokio::test]
async fn unsupported_device_is_a_load_error() {
    let kronos = kronos_with(MockLoader::new());
    let err = kronos
        .load_predictor("kronos-small", Some("tpu"))
        .await
        .unwrap_err();
    assert!(matches!(err, KronosError::Load(_)));
}

#[tokio::test]
async fn failed_load_keeps_previous_predictor() {
    let kronos = kronos_with(MockLoader::new().fail_for(ModelKey::KronosBase));
    kronos.load_predictor("kronos-small", None).await.unwrap();

    let err = kronos.load_predictor("kronos-base", None).await.unwrap_err();
    assert!(matches!(err, KronosError::Load(ref msg) if msg.contains("NeoQuasar/Kronos-base")));
    assert_eq!(
        kronos.current_model().await.unwrap().key(),
        ModelKey::KronosSmall
    );
}

#[tokio::test]
async fn unload_releases_predictor() {
    let (kronos, _controller, _) = kronos_dynamic();
    kronos.load_predictor("kronos-small", None).await.unwrap();
    let gone = kronos.unload().await.unwrap();
    assert_eq!(gone.predictor, crate::helpers::P0);
    assert!(!kronos.is_model_loaded().await);
    assert!(kronos.unload().await.is_none());
}

struct MissingWeights;

#[async_trait]
impl PredictorLoader for MissingWeights {
    async fn load(&self, spec: &ModelSpec, _device: Device) -> Result<Arc<dyn Predictor>, KronosError> {
        Err(KronosError::Io(format!("{}: weights not found", spec.model_id)))
    }
}

#[tokio::test]
async fn loader_io_failures_surface_as_load_errors() {
    let kronos = Kronos::builder()
        .loader(Arc::new(MissingWeights))
        .build()
        .unwrap();
    let err = kronos.load_predictor("kronos-mini", None).await.unwrap_err();
    assert!(matches!(err, KronosError::Load(ref m) if m.contains("weights not found")));
    assert!(kronos.current_model().await.is_none());
}
