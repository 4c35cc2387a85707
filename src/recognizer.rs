//! The inference context tying the pipeline together.
//!
//! A [`Recognizer`] owns every model handle, scaler, label codec, and the
//! ambiguity-set configuration. It is constructed once at startup and passed
//! explicitly to every classification call; there are no process globals.
//! All inference goes through `&self`; the context is immutable after load,
//! so sharing it across threads is sound as long as the underlying `ONNX`
//! session is reentrant (serialize calls externally if it is not).

use crate::{
    cascade::{CascadeController, CascadeState},
    classifier::{LetterClassifier, OnnxLetterModel},
    config::Config,
    cropper::{crop_region, hand_bounding_box},
    features,
    hand_estimation::{HandEstimator, OnnxHandEstimator},
    labels::LabelCodec,
    landmarks::HandLandmarks,
    refiners::{BwRefiner, ClosedFistRefiner, OnnxRegionModel},
    scaler::FeatureScaler,
    sensor::{OnnxSensorModel, SensorClassifier},
    Result,
};
use opencv::core::Mat;
use opencv::prelude::*;

/// Result of one classification request.
///
/// When `detected` is false the label and confidence are placeholders and
/// carry no meaning: a frame without a hand, a rejected sensor reading, or
/// an inference failure all degrade to this shape rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Option<char>,
    pub confidence: f32,
    pub detected: bool,
}

impl Classification {
    /// The absent-hand / invalid-input placeholder
    #[must_use]
    pub fn not_detected() -> Self {
        Self {
            label: None,
            confidence: 0.0,
            detected: false,
        }
    }

    fn resolved(label: char, confidence: f32) -> Self {
        Self {
            label: Some(label),
            confidence,
            detected: true,
        }
    }
}

/// Process-lifetime inference context for both classification paths
pub struct Recognizer {
    classifier: LetterClassifier,
    closed_fist: ClosedFistRefiner,
    bw: BwRefiner,
    cascade: CascadeController,
    crop_padding: f32,
    sensor: Option<SensorClassifier>,
}

impl Recognizer {
    /// Assemble a recognizer from already-loaded parts
    #[must_use]
    pub fn new(
        classifier: LetterClassifier,
        closed_fist: ClosedFistRefiner,
        bw: BwRefiner,
        cascade: CascadeController,
        crop_padding: f32,
        sensor: Option<SensorClassifier>,
    ) -> Self {
        Self {
            classifier,
            closed_fist,
            bw,
            cascade,
            crop_padding,
            sensor,
        }
    }

    /// Load every model artifact named by the configuration.
    ///
    /// All shape validation happens here, at startup. A scaler fitted on the
    /// wrong feature length aborts construction instead of failing per frame.
    ///
    /// # Errors
    ///
    /// Returns an error if any artifact fails to load or validate.
    pub fn from_config(config: &Config) -> Result<Self> {
        let classifier = LetterClassifier::new(
            Box::new(OnnxLetterModel::new(&config.models.letter_model)?),
            FeatureScaler::from_file(&config.models.scaler)?,
            LabelCodec::from_file(&config.models.label_encoder)?,
        )?;

        let closed_fist = ClosedFistRefiner::new(
            Box::new(OnnxRegionModel::new(&config.models.closed_fist_refiner)?),
            LabelCodec::from_file(&config.models.closed_fist_labels)?,
        );

        let bw = BwRefiner::new(Box::new(OnnxRegionModel::new(&config.models.bw_refiner)?));

        let sensor = if config.sensor.enabled {
            let scaler = match &config.sensor.scaler {
                Some(path) => Some(FeatureScaler::from_file(path)?),
                None => None,
            };
            let labels = match LabelCodec::from_file(&config.sensor.classes) {
                Ok(labels) => labels,
                Err(e) => {
                    log::warn!("glove class list unavailable ({e}), using index-to-letter fallback");
                    LabelCodec::IndexToLetter
                }
            };
            Some(SensorClassifier::new(
                Box::new(OnnxSensorModel::new(&config.sensor.model)?),
                scaler,
                labels,
            )?)
        } else {
            None
        };

        Ok(Self::new(
            classifier,
            closed_fist,
            bw,
            config.cascade_controller()?,
            config.crop.padding,
            sensor,
        ))
    }

    /// Build the landmark-model estimator named by the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the landmark model fails to load.
    pub fn hand_estimator(config: &Config) -> Result<OnnxHandEstimator> {
        OnnxHandEstimator::new(&config.models.hand_landmarks, config.detection.min_confidence)
    }

    /// Classify one frame end to end: estimate, extract, predict, cascade.
    ///
    /// Absent hands and estimation or inference failures all come back as
    /// `detected: false`; a bad frame never takes down the capture loop.
    pub fn classify_gesture(&self, estimator: &dyn HandEstimator, frame: &Mat) -> Classification {
        match estimator.estimate(frame) {
            Ok(Some(hand)) => self.classify_landmarks(frame, &hand),
            Ok(None) => Classification::not_detected(),
            Err(e) => {
                log::warn!("hand estimation failed: {e}");
                Classification::not_detected()
            }
        }
    }

    /// Classify a frame whose landmarks are already known.
    ///
    /// Inference failures are caught here, at the adapter boundary, and
    /// reported as `detected: false`.
    pub fn classify_landmarks(&self, frame: &Mat, hand: &HandLandmarks) -> Classification {
        match self.classify_landmarks_inner(frame, hand) {
            Ok(classification) => classification,
            Err(e) => {
                log::warn!("classification failed: {e}");
                Classification::not_detected()
            }
        }
    }

    fn classify_landmarks_inner(&self, frame: &Mat, hand: &HandLandmarks) -> Result<Classification> {
        let width = frame.cols();
        let height = frame.rows();

        let features = features::extract(hand, width, height)?;
        let primary = self.classifier.predict(&features)?;

        // The crop is only worth computing when a refiner will run
        let crop = match self.cascade.route(&primary) {
            CascadeState::ClosedFistRefine | CascadeState::BwRefine => {
                let bbox = hand_bounding_box(&hand.image, width, height, self.crop_padding);
                crop_region(frame, &bbox)?
            }
            CascadeState::Primary | CascadeState::Resolved => None,
        };

        let resolution = self.cascade.resolve(primary, crop.as_ref(), &self.closed_fist, &self.bw)?;
        Ok(Classification::resolved(resolution.label, resolution.confidence))
    }

    /// Classify one flex-sensor reading.
    ///
    /// Wrong-arity readings are rejected (`detected: false`) before any
    /// model call; they are a bad request, not a crash.
    pub fn classify_sensors(&self, reading: &[f32]) -> Classification {
        let Some(sensor) = &self.sensor else {
            log::warn!("sensor path is not configured");
            return Classification::not_detected();
        };

        match sensor.predict(reading) {
            Ok(prediction) => Classification::resolved(prediction.label, prediction.confidence),
            Err(e) => {
                log::warn!("sensor classification rejected: {e}");
                Classification::not_detected()
            }
        }
    }

}
