//! Flex-sensor glove classification.
//!
//! A structurally separate pipeline from the landmark path: five analog
//! readings (thumb, index, middle, ring, pinky) map straight to a class
//! distribution with no ambiguity cascade, since flex-sensor signals do not
//! share the failure modes of vision-based landmark estimation.

use crate::{
    classifier::{argmax, Prediction},
    constants::{NUM_FLEX_SENSORS, SENSOR_FALLBACK_SCALE},
    labels::LabelCodec,
    scaler::FeatureScaler,
    Error, Result,
};
use ndarray::{Array3, CowArray};
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Opaque classifier over a normalized 5-channel sensor reading
pub trait SensorModel: Send + Sync {
    /// Class probabilities for a normalized reading
    ///
    /// # Errors
    ///
    /// Returns an error if model invocation fails.
    fn class_probabilities(&self, reading: &[f32]) -> Result<Vec<f32>>;

    /// Number of classes the model emits, when its metadata exposes it
    fn class_count(&self) -> Option<usize> {
        None
    }
}

/// `ONNX`-backed sensor model
pub struct OnnxSensorModel {
    session: Session,
    class_count: Option<usize>,
}

impl OnnxSensorModel {
    /// Load the glove model from an `ONNX` file
    ///
    /// # Errors
    ///
    /// Returns an error if the model file cannot be loaded or the runtime
    /// environment cannot be created.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!("Initializing sensor model: {}", model_path.as_ref().display());
        let environment = Arc::new(
            Environment::builder()
                .with_name("sensor_model")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        // The distribution output is [batch, classes]; a dynamic class axis
        // leaves the count unknown
        let class_count = session
            .outputs
            .first()
            .and_then(|output| output.dimensions.last().copied().flatten())
            .map(|dim| dim as usize);

        Ok(Self { session, class_count })
    }
}

impl SensorModel for OnnxSensorModel {
    fn class_count(&self) -> Option<usize> {
        self.class_count
    }

    fn class_probabilities(&self, reading: &[f32]) -> Result<Vec<f32>> {
        // The glove model was exported with a (batch, channel, 1) input
        let array = Array3::from_shape_vec((1, reading.len(), 1), reading.to_vec())
            .map_err(|e| Error::ModelInputError(format!("Failed to stage reading: {e}")))?;

        let cow_array = CowArray::from(array.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        let output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelOutputError("No output from sensor model".to_string()))?;

        let tensor = output.try_extract::<f32>()?;
        let view = tensor.view();
        let probs = view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError("Failed to read distribution".to_string()))?;

        Ok(probs.to_vec())
    }
}

/// Single-shot classifier for the flex-sensor glove
pub struct SensorClassifier {
    model: Box<dyn SensorModel>,
    scaler: Option<FeatureScaler>,
    labels: LabelCodec,
}

impl SensorClassifier {
    /// Assemble the sensor classifier, validating the optional scaler shape.
    ///
    /// Without a trained scaler, readings fall back to a fixed ÷1024
    /// normalization mapping the typical analog range into roughly [0, 1].
    ///
    /// # Errors
    ///
    /// Returns [`Error::FeatureShapeMismatch`] if a scaler is present but was
    /// not fitted on 5 channels, or [`Error::ModelValidationError`] when an
    /// explicit class list does not cover the model's class count.
    pub fn new(model: Box<dyn SensorModel>, scaler: Option<FeatureScaler>, labels: LabelCodec) -> Result<Self> {
        if let Some(scaler) = &scaler {
            if scaler.expected_len() != NUM_FLEX_SENSORS {
                return Err(Error::FeatureShapeMismatch {
                    expected: scaler.expected_len(),
                    actual: NUM_FLEX_SENSORS,
                });
            }
        }
        // The positional fallback tolerates any count via its sentinel; a
        // mismatched explicit class list would mislabel every reading
        if let (Some(model_classes), LabelCodec::Encoder(_)) = (model.class_count(), &labels) {
            if model_classes != labels.class_count() {
                return Err(Error::ModelValidationError(format!(
                    "model emits {model_classes} classes but the class list holds {}",
                    labels.class_count()
                )));
            }
        }
        Ok(Self { model, scaler, labels })
    }

    /// Classify one glove reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSensorInput`] for any reading that is not
    /// exactly 5 values (checked before normalization or any model call,
    /// never padded or truncated), or an error if model invocation fails.
    pub fn predict(&self, reading: &[f32]) -> Result<Prediction> {
        if reading.len() != NUM_FLEX_SENSORS {
            return Err(Error::InvalidSensorInput {
                expected: NUM_FLEX_SENSORS,
                actual: reading.len(),
            });
        }

        let normalized = match &self.scaler {
            Some(scaler) => scaler.transform(reading)?,
            None => reading.iter().map(|v| v / SENSOR_FALLBACK_SCALE).collect(),
        };

        let probs = self.model.class_probabilities(&normalized)?;
        let (index, confidence) = argmax(&probs)?;
        let label = self.labels.decode(index);
        log::debug!("sensor prediction: {label} ({confidence:.3})");
        Ok(Prediction { label, confidence })
    }
}
