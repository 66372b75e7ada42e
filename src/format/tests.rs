use super::*;
use crate::prelude::*;

fn fitted(kind: ModelKind) -> Pipeline {
    let x = Matrix::from_vec(
        6,
        2,
        vec![1.0, 0.5, 2.0, 0.1, 3.0, 0.9, 4.0, 0.3, 5.0, 0.7, 6.0, 0.2],
    )
    .unwrap();
    let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
    let mut pipeline = Pipeline::for_kind(kind, 42);
    pipeline.fit(&x, &y).unwrap();
    pipeline
}

#[test]
fn test_crc32_known_value() {
    assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    assert_eq!(crc32(b""), 0);
}

#[test]
fn test_header_round_trip() {
    let header = Header {
        version: FORMAT_VERSION,
        kind: ModelKind::Ridge,
        payload_size: 1234,
    };
    let bytes = header.to_bytes();
    assert_eq!(&bytes[0..4], b"PRGM");
    assert_eq!(Header::from_bytes(&bytes).unwrap(), header);
}

#[test]
fn test_header_rejects_bad_magic_and_version() {
    let mut bytes = Header {
        version: FORMAT_VERSION,
        kind: ModelKind::Linear,
        payload_size: 0,
    }
    .to_bytes();

    let mut bad_magic = bytes;
    bad_magic[0] = b'X';
    assert!(matches!(
        Header::from_bytes(&bad_magic),
        Err(ProgressionError::FormatError { .. })
    ));

    bytes[4..6].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
    assert!(matches!(
        Header::from_bytes(&bytes),
        Err(ProgressionError::UnsupportedVersion { .. })
    ));
}

#[test]
fn test_header_rejects_unknown_kind() {
    let mut bytes = Header {
        version: FORMAT_VERSION,
        kind: ModelKind::Linear,
        payload_size: 0,
    }
    .to_bytes();
    bytes[6..8].copy_from_slice(&0x00FFu16.to_le_bytes());
    assert!(Header::from_bytes(&bytes).is_err());
}

#[test]
fn test_model_bytes_preserve_predictions() {
    let probe = Matrix::from_vec(1, 2, vec![3.5, 0.4]).unwrap();
    for kind in ModelKind::ALL {
        let pipeline = fitted(kind);
        let restored = model_from_bytes(&model_to_bytes(&pipeline).unwrap()).unwrap();
        assert_eq!(restored.kind(), kind);
        assert_eq!(
            restored.predict(&probe).unwrap(),
            pipeline.predict(&probe).unwrap()
        );
    }
}

#[test]
fn test_corrupted_payload_fails_checksum() {
    let mut bytes = model_to_bytes(&fitted(ModelKind::Linear)).unwrap();
    let mid = HEADER_SIZE + 3;
    bytes[mid] ^= 0xFF;
    assert!(matches!(
        model_from_bytes(&bytes),
        Err(ProgressionError::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_truncated_file_fails() {
    let bytes = model_to_bytes(&fitted(ModelKind::Linear)).unwrap();
    assert!(model_from_bytes(&bytes[..10]).is_err());
    assert!(model_from_bytes(&bytes[..bytes.len() - 1]).is_err());
}

#[test]
fn test_save_and_load_model_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    assert_eq!(paths.model.file_name().unwrap(), MODEL_FILE);

    let pipeline = fitted(ModelKind::Ridge);
    save_model(&pipeline, &paths.model).unwrap();
    assert_eq!(load_model(&paths.model).unwrap(), pipeline);
}

#[test]
fn test_load_missing_model_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_model(dir.path().join(MODEL_FILE)).unwrap_err();
    assert!(matches!(err, ProgressionError::Io(_)));
}

#[test]
fn test_metrics_json_omits_absent_threshold_fields() {
    let doc = MetricsDocument {
        model_name: "StandardScaler+LinearRegression".to_string(),
        seed: 42,
        rmse: 53.5,
        n_train: 353,
        n_test: 89,
        features: vec!["age".to_string(), "sex".to_string()],
        flag_threshold: None,
        precision_at_thresh: None,
        recall_at_thresh: None,
    };
    let json = doc.to_json_pretty().unwrap();
    assert!(json.contains("\"model_name\": \"StandardScaler+LinearRegression\""));
    assert!(!json.contains("flag_threshold"));

    let back: MetricsDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn test_metrics_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    let doc = MetricsDocument {
        model_name: "RandomForestRegressor(n_estimators=300)".to_string(),
        seed: 42,
        rmse: 54.3,
        n_train: 353,
        n_test: 89,
        features: vec!["bmi".to_string()],
        flag_threshold: Some(200.0),
        precision_at_thresh: Some(0.75),
        recall_at_thresh: Some(0.5),
    };
    doc.save(&paths.metrics).unwrap();
    assert_eq!(MetricsDocument::load(&paths.metrics).unwrap(), doc);
}
