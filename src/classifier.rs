//! Primary letter classification from geometric features.
//!
//! The trained model is an opaque collaborator: anything that maps a scaled
//! feature vector to a class-probability distribution can sit behind
//! [`LetterModel`]. The production implementation wraps an `ONNX` session;
//! tests substitute fixed distributions.

use crate::{
    constants::FEATURE_VECTOR_LEN,
    labels::LabelCodec,
    scaler::FeatureScaler,
    Error, Result,
};
use ndarray::{Array2, CowArray};
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// A single classification outcome: the winning label and its probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: char,
    pub confidence: f32,
}

/// Opaque feature-vector classifier producing a class distribution
pub trait LetterModel: Send + Sync {
    /// Class probabilities for a scaled feature vector
    ///
    /// # Errors
    ///
    /// Returns an error if model invocation fails.
    fn class_probabilities(&self, features: &[f32]) -> Result<Vec<f32>>;

    /// Number of classes the model emits, when its metadata exposes it
    fn class_count(&self) -> Option<usize> {
        None
    }
}

/// Index and value of the distribution maximum
///
/// # Errors
///
/// Returns an error for an empty or all-NaN distribution.
pub(crate) fn argmax(probs: &[f32]) -> Result<(usize, f32)> {
    probs
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_nan())
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, &p)| (i, p))
        .ok_or_else(|| Error::ModelOutputError("model produced an empty distribution".to_string()))
}

/// `ONNX`-backed letter model
pub struct OnnxLetterModel {
    session: Session,
    class_count: Option<usize>,
}

impl OnnxLetterModel {
    /// Load the primary letter model from an `ONNX` file
    ///
    /// # Errors
    ///
    /// Returns an error if the model file cannot be loaded or the runtime
    /// environment cannot be created.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!("Initializing letter model: {}", model_path.as_ref().display());
        let environment = Arc::new(
            Environment::builder()
                .with_name("letter_model")
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

impl LetterModel for OnnxLetterModel {
    fn class_count(&self) -> Option<usize> {
        self.class_count
    }

    fn class_probabilities(&self, features: &[f32]) -> Result<Vec<f32>> {
        let array = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| Error::ModelInputError(format!("Failed to stage features: {e}")))?;

        let cow_array = CowArray::from(array.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        let output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelOutputError("No output from letter model".to_string()))?;

        let tensor = output.try_extract::<f32>()?;
        let view = tensor.view();
        let probs = view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError("Failed to read distribution".to_string()))?;

        Ok(probs.to_vec())
    }
}

/// Primary Classifier Adapter: scaler, model, and label decoding in one seam
pub struct LetterClassifier {
    model: Box<dyn LetterModel>,
    scaler: FeatureScaler,
    labels: LabelCodec,
}

impl LetterClassifier {
    /// Assemble the adapter, validating shapes at startup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FeatureShapeMismatch`] when the scaler was fitted on
    /// a different length than the extractor produces, or
    /// [`Error::ModelValidationError`] when an explicit label encoder does
    /// not cover the model's class count. Surfacing these here keeps a
    /// misconfigured deployment from failing once per frame.
    pub fn new(model: Box<dyn LetterModel>, scaler: FeatureScaler, labels: LabelCodec) -> Result<Self> {
        if scaler.expected_len() != FEATURE_VECTOR_LEN {
            return Err(Error::FeatureShapeMismatch {
                expected: scaler.expected_len(),
                actual: FEATURE_VECTOR_LEN,
            });
        }
        // The positional fallback tolerates any count via its sentinel; a
        // mismatched explicit encoder would mislabel every frame
        if let (Some(model_classes), LabelCodec::Encoder(_)) = (model.class_count(), &labels) {
            if model_classes != labels.class_count() {
                return Err(Error::ModelValidationError(format!(
                    "model emits {model_classes} classes but the label encoder holds {}",
                    labels.class_count()
                )));
            }
        }
        Ok(Self { model, scaler, labels })
    }

    /// Scale a feature vector, query the model, and decode the argmax.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature length mismatches the scaler or the
    /// model invocation fails.
    pub fn predict(&self, features: &[f32]) -> Result<Prediction> {
        let scaled = self.scaler.transform(features)?;
        let probs = self.model.class_probabilities(&scaled)?;
        let (index, confidence) = argmax(&probs)?;
        let label = self.labels.decode(index);
        log::debug!("primary prediction: {label} ({confidence:.3})");
        Ok(Prediction { label, confidence })
    }
}
