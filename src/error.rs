//! Error types for the ASL recognition library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON artifact parsing failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV dataset parsing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A landmark set did not contain exactly the expected number of points
    #[error("invalid landmark set: expected {expected} landmarks, got {actual}")]
    InvalidLandmarkSet { expected: usize, actual: usize },

    /// Feature vector length does not match what the scaler/model was fitted on
    #[error("feature shape mismatch: expected {expected} features, got {actual}")]
    FeatureShapeMismatch { expected: usize, actual: usize },

    /// A flex-sensor reading did not contain exactly one value per finger
    #[error("invalid sensor input: expected {expected} readings, got {actual}")]
    InvalidSensorInput { expected: usize, actual: usize },

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model loading or inference error
    #[error("Model error: {0}")]
    ModelError(String),

    /// Model input configuration error
    #[error("Model input error: {0}")]
    ModelInputError(String),

    /// Model output processing error
    #[error("Model output error: {0}")]
    ModelOutputError(String),

    /// Model artifact validation error (wrong parameter counts, bad labels, etc.)
    #[error("Model validation error: {0}")]
    ModelValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
