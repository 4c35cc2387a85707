//! Integration tests for the ASL recognition pipeline

use asl_recognition::{config::Config, recognizer::Recognizer};
use opencv::{core::Mat, prelude::*};

/// Test the complete pipeline from frame to final label
#[test]
#[ignore = "Requires ONNX models and artifacts under assets/"]
fn test_full_pipeline() {
    let config = Config::default();
    config.validate().expect("default assets must be present");

    let recognizer = Recognizer::from_config(&config).expect("Failed to load models");
    let estimator = Recognizer::hand_estimator(&config).expect("Failed to load hand model");

    // Synthetic empty frame: no hand should be found, and nothing may panic
    let frame = Mat::zeros(480, 640, opencv::core::CV_8UC3).unwrap().to_mat().unwrap();

    let result = recognizer.classify_gesture(&estimator, &frame);
    if result.detected {
        let label = result.label.expect("detected result carries a label");
        assert!(label.is_ascii_uppercase() || label == '?');
        assert!((0.0..=1.0).contains(&result.confidence));
    } else {
        assert!(result.label.is_none());
    }
}

/// Sensor-glove pipeline against real artifacts
#[test]
#[ignore = "Requires ONNX models and artifacts under assets/"]
fn test_sensor_pipeline() {
    let mut config = Config::default();
    config.sensor.enabled = true;
    config.validate().expect("glove assets must be present");

    let recognizer = Recognizer::from_config(&config).expect("Failed to load models");

    // The letter-A glove pattern must classify deterministically
    let first = recognizer.classify_sensors(&[850.0, 150.0, 120.0, 100.0, 80.0]);
    assert!(first.detected);
    let second = recognizer.classify_sensors(&[850.0, 150.0, 120.0, 100.0, 80.0]);
    assert_eq!(first, second);
}

#[test]
fn test_config_round_trip() {
    let path = std::env::temp_dir().join(format!("asl_config_{}.yaml", std::process::id()));

    let mut config = Config::default();
    config.cascade.confidence_threshold = 0.85;
    config.crop.padding = 0.25;
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert!((loaded.cascade.confidence_threshold - 0.85).abs() < f32::EPSILON);
    assert!((loaded.crop.padding - 0.25).abs() < f32::EPSILON);
    assert_eq!(loaded.cascade.closed_fist_set, config.cascade.closed_fist_set);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_example_config_is_valid_yaml() {
    let config: Config = serde_yaml::from_str(asl_recognition::config::EXAMPLE_CONFIG).unwrap();
    assert_eq!(config.cascade.bw_set, vec!['B', 'W']);
}
