use std::sync::Arc;
use std::time::Duration;

use kronos::{Device, ErrorKind, Kronos, KronosConfig, ModelKey};
use kronos_mock::MockLoader;

#[test]
fn build_requires_a_loader() {
    let err = Kronos::builder().build().err().unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn build_rejects_zero_timeout() {
    let err = Kronos::builder()
        .loader(Arc::new(MockLoader::new()))
        .prediction_timeout(Duration::ZERO)
        .build()
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn modifiers_override_config() {
    let cfg = KronosConfig {
        max_file_size: 1,
        ..KronosConfig::default()
    };
    let kronos = Kronos::builder()
        .loader(Arc::new(MockLoader::new()))
        .config(cfg)
        .device(Device::Mps)
        .data_dir("/tmp/prices")
        .prediction_timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let cfg = kronos.config();
    assert_eq!(cfg.default_device, Device::Mps);
    assert_eq!(cfg.max_file_size, 1);
    assert_eq!(cfg.data_dir, std::path::PathBuf::from("/tmp/prices"));
    assert_eq!(cfg.prediction_timeout, Duration::from_secs(5));
}

#[test]
fn catalog_lists_every_model() {
    let kronos = crate::helpers::kronos_with(MockLoader::new());
    let models = kronos.available_models();
    let keys: Vec<_> = models.iter().map(|m| m.key).collect();
    assert_eq!(keys, ModelKey::ALL);
    assert_eq!(models[0].context_length, 2048);
    assert_eq!(models[1].model_id, "NeoQuasar/Kronos-small");
}

#[test]
fn request_builder_uses_configured_defaults() {
    let kronos = Kronos::builder()
        .loader(Arc::new(MockLoader::new()))
        .prediction_defaults(kronos::PredictionDefaults {
            lookback: 64,
            pred_len: 8,
            ..kronos::PredictionDefaults::default()
        })
        .build()
        .unwrap();
    let req = kronos.request().build().unwrap();
    assert_eq!((req.lookback(), req.pred_len()), (64, 8));
    assert_eq!(req.top_p(), 0.9);
}
