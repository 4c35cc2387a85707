//! Hand landmark estimation boundary.
//!
//! The pipeline treats the pose estimator as a black box producing at most
//! one hand's landmark sets per frame. [`HandEstimator`] is that boundary;
//! [`OnnxHandEstimator`] is a thin adapter over a landmark model exported to
//! `ONNX`, doing only I/O staging. No detection logic lives here.

use crate::{
    constants::NUM_HAND_LANDMARKS,
    landmarks::{HandLandmarks, LandmarkSet},
    Error, Result,
};
use ndarray::{Array4, CowArray};
use opencv::core::{Mat, Size, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Default landmark model input size
const DEFAULT_ESTIMATOR_INPUT_SIZE: i32 = 224;

/// Pose-estimation collaborator: one frame in, at most one hand out
pub trait HandEstimator: Send + Sync {
    /// Estimate landmarks for the single most prominent hand.
    ///
    /// Returns `Ok(None)` when no hand is present in the frame.
    ///
    /// # Errors
    ///
    /// Returns an error if estimation itself fails.
    fn estimate(&self, frame: &Mat) -> Result<Option<HandLandmarks>>;
}

/// Landmark estimator backed by an `ONNX` hand-landmark model.
///
/// Expects the common four-output export: screen landmarks (63 values in
/// input-pixel units), a hand-presence score, handedness, and world
/// landmarks (63 metric values).
pub struct OnnxHandEstimator {
    session: Session,
    input_size: i32,
    min_confidence: f32,
}

impl OnnxHandEstimator {
    /// Load a hand-landmark model from an `ONNX` file
    ///
    /// # Errors
    ///
    /// Returns an error if the model file cannot be loaded or the runtime
    /// environment cannot be created.
    pub fn new<P: AsRef<Path>>(model_path: P, min_confidence: f32) -> Result<Self> {
        log::info!("Initializing hand estimator: {}", model_path.as_ref().display());
        let environment = Arc::new(
            Environment::builder()
                .with_name("hand_estimator")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        Ok(Self {
            session,
            input_size: DEFAULT_ESTIMATOR_INPUT_SIZE,
            min_confidence,
        })
    }

    fn preprocess(&self, frame: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size as usize;

        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let mut data = vec![0.0f32; size * size * 3];
        for row in 0..size {
            for col in 0..size {
                #[allow(clippy::cast_possible_truncation)] // input size is small
                let pixel = *float_image.at_2d::<opencv::core::Vec3f>(row as i32, col as i32)?;
                let base = (row * size + col) * 3;
                data[base] = pixel[0];
                data[base + 1] = pixel[1];
                data[base + 2] = pixel[2];
            }
        }

        Array4::from_shape_vec((1, size, size, 3), data)
            .map_err(|e| Error::ModelInputError(format!("Failed to stage frame: {e}")))
    }

    fn extract_output(value: &ort::Value, expected_len: usize, what: &str) -> Result<Vec<f32>> {
        let tensor = value.try_extract::<f32>()?;
        let view = tensor.view();
        let data = view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError(format!("Failed to read {what}")))?;
        if data.len() != expected_len {
            return Err(Error::ModelOutputError(format!(
                "{what} has {} values, expected {expected_len}",
                data.len()
            )));
        }
        Ok(data.to_vec())
    }
}

impl HandEstimator for OnnxHandEstimator {
    fn estimate(&self, frame: &Mat) -> Result<Option<HandLandmarks>> {
        let inputs = self.preprocess(frame)?;
        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;
        if outputs.len() < 4 {
            return Err(Error::ModelOutputError(format!(
                "hand model produced {} outputs, expected 4",
                outputs.len()
            )));
        }

        let presence = Self::extract_output(&outputs[1], 1, "presence score")?[0];
        if presence < self.min_confidence {
            return Ok(None);
        }

        let screen = Self::extract_output(&outputs[0], NUM_HAND_LANDMARKS * 3, "screen landmarks")?;
        let world = Self::extract_output(&outputs[3], NUM_HAND_LANDMARKS * 3, "world landmarks")?;

        // Screen coordinates arrive in input-pixel units; normalize to [0, 1]
        let scale = self.input_size as f32;
        let normalized: Vec<f32> = screen.iter().map(|v| v / scale).collect();

        Ok(Some(HandLandmarks {
            image: LandmarkSet::from_flat(&normalized)?,
            world: LandmarkSet::from_flat(&world)?,
        }))
    }
}
