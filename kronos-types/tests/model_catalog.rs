use kronos_types::{
    Device, ErrorKind, KronosConfig, KronosError, ModelKey, Resource,
};

#[test]
fn catalog_contains_all_models() {
    let keys: Vec<&str> = ModelKey::ALL.iter().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["kronos-mini", "kronos-small", "kronos-base"]);
}

#[test]
fn context_lengths_match_checkpoints() {
    assert_eq!(ModelKey::KronosMini.spec().context_length, 2048);
    assert_eq!(ModelKey::KronosSmall.spec().context_length, 512);
    assert_eq!(ModelKey::KronosBase.spec().context_length, 512);
    assert_eq!(
        ModelKey::KronosMini.spec().tokenizer_id,
        "NeoQuasar/Kronos-Tokenizer-2k"
    );
}

#[test]
fn parse_model_key() {
    assert_eq!("kronos-small".parse::<ModelKey>().unwrap(), ModelKey::KronosSmall);
    let err = "kronos-huge".parse::<ModelKey>().unwrap_err();
    assert_eq!(err, KronosError::unknown_model("kronos-huge"));
    assert_eq!(err.kind(), ErrorKind::Load);
}

#[test]
fn parse_device() {
    assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
    assert_eq!("cuda".parse::<Device>().unwrap(), Device::Cuda(None));
    assert_eq!("cuda:1".parse::<Device>().unwrap(), Device::Cuda(Some(1)));
    assert_eq!("mps".parse::<Device>().unwrap(), Device::Mps);
    assert_eq!(Device::Cuda(Some(1)).to_string(), "cuda:1");

    let err = "tpu".parse::<Device>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Load);
    assert!("cuda:x".parse::<Device>().is_err());
}

#[test]
fn not_ready_messages_name_the_resource() {
    assert_eq!(KronosError::not_ready(Resource::Model).to_string(), "model not loaded");
    assert_eq!(KronosError::not_ready(Resource::Data).to_string(), "data not loaded");
    assert!(KronosError::not_ready(Resource::Data).is_recoverable());
    assert!(!KronosError::Prediction("boom".into()).is_recoverable());
}

#[test]
fn config_defaults_and_partial_deserialize() {
    let cfg = KronosConfig::default();
    assert_eq!(cfg.default_device, Device::Cpu);
    assert_eq!(cfg.prediction_timeout, std::time::Duration::from_secs(120));
    assert!(cfg.allows_extension("csv"));
    assert!(cfg.allows_extension("PARQUET"));
    assert!(!cfg.allows_extension("xlsx"));

    let de: KronosConfig =
        serde_json::from_str(r#"{"default_device": "cuda:0", "max_file_size": 1024}"#).unwrap();
    assert_eq!(de.default_device, Device::Cuda(Some(0)));
    assert_eq!(de.max_file_size, 1024);
    assert_eq!(de.prediction_defaults.lookback, 400);
}
