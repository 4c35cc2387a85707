//! Secondary refiner models for ambiguous predictions.
//!
//! Two refiners exist: a multi-class model that separates the closed-fist
//! letters, and a binary model that separates B from W. Both consume the
//! 128×128 crop produced by the cropper and nothing else. A refiner's output
//! is final; it is never re-checked against the ambiguity sets.

use crate::{
    classifier::{argmax, Prediction},
    constants::{BW_DECISION_BOUNDARY, REFINER_INPUT_SIZE},
    cropper::CropImage,
    labels::LabelCodec,
    Error, Result,
};
use ndarray::{Array4, CowArray};
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Opaque multi-class model over hand-region crops
pub trait RegionModel: Send + Sync {
    /// Class probabilities for a crop
    ///
    /// # Errors
    ///
    /// Returns an error if model invocation fails.
    fn class_probabilities(&self, crop: &CropImage) -> Result<Vec<f32>>;
}

/// Opaque binary model over hand-region crops, emitting a scalar in [0, 1]
pub trait BinaryRegionModel: Send + Sync {
    /// Sigmoid score for a crop
    ///
    /// # Errors
    ///
    /// Returns an error if model invocation fails.
    fn score(&self, crop: &CropImage) -> Result<f32>;
}

/// `ONNX`-backed region model, usable for both refiner roles
pub struct OnnxRegionModel {
    session: Session,
}

impl OnnxRegionModel {
    /// Load a region refiner from an `ONNX` file
    ///
    /// # Errors
    ///
    /// Returns an error if the model file cannot be loaded or the runtime
    /// environment cannot be created.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!("Initializing region refiner: {}", model_path.as_ref().display());
        let environment = Arc::new(
            Environment::builder()
                .with_name("region_refiner")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        Ok(Self { session })
    }

    fn forward(&self, crop: &CropImage) -> Result<Vec<f32>> {
        let size = REFINER_INPUT_SIZE as usize;
        // The refiners were exported from an HWC training pipeline, so the
        // crop is staged as NHWC
        let array = Array4::from_shape_vec((1, size, size, 3), crop.as_slice().to_vec())
            .map_err(|e| Error::ModelInputError(format!("Failed to stage crop: {e}")))?;

        let cow_array = CowArray::from(array.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        let output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelOutputError("No output from refiner".to_string()))?;

        let tensor = output.try_extract::<f32>()?;
        let view = tensor.view();
        let values = view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError("Failed to read refiner output".to_string()))?;

        Ok(values.to_vec())
    }
}

impl RegionModel for OnnxRegionModel {
    fn class_probabilities(&self, crop: &CropImage) -> Result<Vec<f32>> {
        self.forward(crop)
    }
}

impl BinaryRegionModel for OnnxRegionModel {
    fn score(&self, crop: &CropImage) -> Result<f32> {
        self.forward(crop)?
            .first()
            .copied()
            .ok_or_else(|| Error::ModelOutputError("Binary refiner produced no score".to_string()))
    }
}

/// Multi-class refiner for the closed-fist letters (A, E, O, S, M, N, T)
pub struct ClosedFistRefiner {
    model: Box<dyn RegionModel>,
    labels: LabelCodec,
}

impl ClosedFistRefiner {
    #[must_use]
    pub fn new(model: Box<dyn RegionModel>, labels: LabelCodec) -> Self {
        Self { model, labels }
    }

    /// Re-classify a crop among the closed-fist letters
    ///
    /// # Errors
    ///
    /// Returns an error if model invocation fails.
    pub fn refine(&self, crop: &CropImage) -> Result<Prediction> {
        let probs = self.model.class_probabilities(crop)?;
        let (index, confidence) = argmax(&probs)?;
        let label = self.labels.decode(index);
        log::debug!("closed-fist refiner: {label} ({confidence:.3})");
        Ok(Prediction { label, confidence })
    }
}

/// Binary refiner separating B from W.
///
/// The model emits a sigmoid scalar; scores above the 0.5 boundary mean W,
/// at or below mean B.
pub struct BwRefiner {
    model: Box<dyn BinaryRegionModel>,
}

impl BwRefiner {
    #[must_use]
    pub fn new(model: Box<dyn BinaryRegionModel>) -> Self {
        Self { model }
    }

    /// Decide between B and W for a crop
    ///
    /// # Errors
    ///
    /// Returns an error if model invocation fails.
    pub fn refine(&self, crop: &CropImage) -> Result<Prediction> {
        let score = self.model.score(crop)?;
        let (label, confidence) = if score > BW_DECISION_BOUNDARY {
            ('W', score)
        } else {
            ('B', 1.0 - score)
        };
        log::debug!("b/w refiner: {label} (score {score:.3})");
        Ok(Prediction { label, confidence })
    }
}
