//! ASL letter recognition library for real-time hand gesture classification.
//!
//! This library provides a Rust implementation of cascaded ASL letter
//! recognition using:
//! - ONNX Runtime for deep learning inference
//! - `OpenCV` for computer vision operations
//! - A confidence-gated cascade escalating ambiguous predictions to
//!   specialized refiner models
//!
//! The recognition pipeline consists of:
//! 1. Hand landmark estimation producing image-space and world-space sets
//! 2. Geometric feature derivation (joint angles, tip distances, hull area)
//! 3. Primary classification over the scaled 79-value feature vector
//! 4. Confidence-gated refinement of ambiguous letters from the cropped
//!    hand region
//!
//! A parallel, single-shot pipeline classifies 5-channel flex-sensor glove
//! readings with no cascade.
//!
//! # Examples
//!
//! ## Classifying camera frames
//!
//! ```no_run
//! use asl_recognition::{config::Config, recognizer::Recognizer};
//! use opencv::imgcodecs;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load every model artifact once, at startup
//! let config = Config::default();
//! config.validate()?;
//! let recognizer = Recognizer::from_config(&config)?;
//! let estimator = Recognizer::hand_estimator(&config)?;
//!
//! let frame = imgcodecs::imread("hand.jpg", imgcodecs::IMREAD_COLOR)?;
//!
//! let result = recognizer.classify_gesture(&estimator, &frame);
//! if result.detected {
//!     println!("{} ({:.2})", result.label.unwrap(), result.confidence);
//! } else {
//!     println!("no hand detected");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Classifying glove readings
//!
//! ```no_run
//! use asl_recognition::labels::LabelCodec;
//! use asl_recognition::sensor::{OnnxSensorModel, SensorClassifier};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = SensorClassifier::new(
//!     Box::new(OnnxSensorModel::new("assets/glove_cnn_model.onnx")?),
//!     None, // fall back to the fixed ÷1024 normalization
//!     LabelCodec::IndexToLetter,
//! )?;
//!
//! let prediction = classifier.predict(&[850.0, 150.0, 120.0, 100.0, 80.0])?;
//! println!("{} ({:.2})", prediction.label, prediction.confidence);
//! # Ok(())
//! # }
//! ```

/// Hand landmark data model and anatomical indexing
pub mod landmarks;

/// Geometric feature derivation from landmark sets
pub mod features;

/// Pre-fitted feature scaling
pub mod scaler;

/// Class-index to letter decoding
pub mod labels;

/// Primary classification over feature vectors
pub mod classifier;

/// Secondary refiner models for ambiguous predictions
pub mod refiners;

/// Hand-region extraction for the refiners
pub mod cropper;

/// Confidence-gated cascade state machine
pub mod cascade;

/// Flex-sensor glove classification
pub mod sensor;

/// Flex-sensor CSV dataset recording and loading
pub mod sensor_log;

/// Hand landmark estimation boundary
pub mod hand_estimation;

/// The inference context tying both pipelines together
pub mod recognizer;

/// Letter-to-audio lookup for announcing predictions
pub mod audio;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
