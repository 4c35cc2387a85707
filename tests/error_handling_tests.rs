//! Error handling tests for all modules

use asl_recognition::{
    classifier::{LetterClassifier, LetterModel},
    config::Config,
    constants::FEATURE_VECTOR_LEN,
    labels::LabelCodec,
    landmarks::{Landmark, LandmarkSet},
    scaler::FeatureScaler,
    sensor::{SensorClassifier, SensorModel},
    Error, Result,
};

struct StubLetter;
impl LetterModel for StubLetter {
    fn class_probabilities(&self, _features: &[f32]) -> Result<Vec<f32>> {
        Ok(vec![1.0])
    }
}

struct StubSensor;
impl SensorModel for StubSensor {
    fn class_probabilities(&self, _reading: &[f32]) -> Result<Vec<f32>> {
        Ok(vec![1.0])
    }
}

#[test]
fn test_landmark_count_is_validated() {
    for count in [0usize, 1, 20, 22, 42] {
        let result = LandmarkSet::new(vec![Landmark::default(); count]);
        match result {
            Err(Error::InvalidLandmarkSet { expected: 21, actual }) => assert_eq!(actual, count),
            other => panic!("count {count}: expected InvalidLandmarkSet, got {other:?}"),
        }
    }
}

#[test]
fn test_flat_landmark_buffer_is_validated() {
    // 62 values is neither truncated nor padded into a set
    assert!(LandmarkSet::from_flat(&vec![0.0; 62]).is_err());
    assert!(LandmarkSet::from_flat(&vec![0.0; 63]).is_ok());
}

#[test]
fn test_misfitted_scaler_fails_at_assembly_not_per_frame() {
    // A scaler fitted on 50 features cannot reach prediction time
    let scaler = FeatureScaler::new(vec![0.0; 50], vec![1.0; 50]).unwrap();
    let result = LetterClassifier::new(Box::new(StubLetter), scaler, LabelCodec::IndexToLetter);

    match result {
        Err(Error::FeatureShapeMismatch { expected, actual }) => {
            assert_eq!(expected, 50);
            assert_eq!(actual, FEATURE_VECTOR_LEN);
        }
        other => panic!("expected FeatureShapeMismatch, got {:?}", other.err()),
    }
}

#[test]
fn test_sensor_scaler_shape_checked_at_assembly() {
    let scaler = FeatureScaler::new(vec![0.0; 4], vec![1.0; 4]).unwrap();
    let result = SensorClassifier::new(Box::new(StubSensor), Some(scaler), LabelCodec::IndexToLetter);
    assert!(matches!(result, Err(Error::FeatureShapeMismatch { expected: 4, .. })));
}

#[test]
fn test_scaler_artifact_validation() {
    // Mismatched parameter vectors
    assert!(FeatureScaler::new(vec![0.0; 79], vec![1.0; 78]).is_err());
    // Zero scale would divide a feature away silently
    assert!(FeatureScaler::new(vec![0.0, 0.0], vec![1.0, 0.0]).is_err());
}

#[test]
fn test_config_validation_errors() {
    let mut config = Config::default();
    config.cascade.confidence_threshold = -0.2;
    assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

    let mut config = Config::default();
    config.crop.padding = 1.0;
    assert!(config.validate().is_err());

    // Overlapping ambiguity sets are a configuration error
    let mut config = Config::default();
    config.cascade.bw_set.push('A');
    assert!(config.validate().is_err());

    // Missing model files are caught before any session is created
    let mut config = Config::default();
    config.models.letter_model = "/nonexistent/model.onnx".into();
    assert!(config.validate().is_err());
}

#[test]
fn test_label_artifact_validation() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("asl_labels_bad_{}.json", std::process::id()));

    std::fs::write(&path, r#"["A", "BC"]"#).unwrap();
    assert!(matches!(LabelCodec::from_file(&path), Err(Error::ModelValidationError(_))));

    std::fs::write(&path, r"[]").unwrap();
    assert!(LabelCodec::from_file(&path).is_err());

    std::fs::write(&path, r#"["a", "b", "w"]"#).unwrap();
    let codec = LabelCodec::from_file(&path).unwrap();
    assert_eq!(codec.decode(2), 'W');

    let _ = std::fs::remove_file(&path);
}
