//! Pre-fitted feature scaling.
//!
//! The training pipeline standardizes feature vectors before the model sees
//! them; the fitted mean and scale are exported alongside the model as a JSON
//! artifact. The scaler is an opaque transform here: parameters are loaded,
//! validated, and applied, never re-fitted.

use crate::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ScalerJson {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

/// Standardizing transform with fit-time parameters baked in
#[derive(Debug, Clone)]
pub struct FeatureScaler {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl FeatureScaler {
    /// Create a scaler from fitted parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter vectors differ in length, are empty,
    /// or contain a zero scale entry.
    pub fn new(mean: Vec<f32>, scale: Vec<f32>) -> Result<Self> {
        if mean.len() != scale.len() {
            return Err(Error::ModelValidationError(format!(
                "scaler mean has {} entries but scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        if mean.is_empty() {
            return Err(Error::ModelValidationError("scaler has no parameters".to_string()));
        }
        if scale.iter().any(|&s| s == 0.0 || !s.is_finite()) {
            return Err(Error::ModelValidationError(
                "scaler contains zero or non-finite scale entries".to_string(),
            ));
        }
        Ok(Self { mean, scale })
    }

    /// Load fitted parameters from a JSON artifact
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// parameter validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::info!("Loading feature scaler from {}", path.as_ref().display());
        let content = fs::read_to_string(path)?;
        let params: ScalerJson = serde_json::from_str(&content)?;
        Self::new(params.mean, params.scale)
    }

    /// Input length the scaler was fitted on
    #[must_use]
    pub fn expected_len(&self) -> usize {
        self.mean.len()
    }

    /// Standardize a feature vector: `(x - mean) / scale` per component
    ///
    /// # Errors
    ///
    /// Returns [`Error::FeatureShapeMismatch`] if the input length does not
    /// match the fit-time length. Validated here, before any model call.
    pub fn transform(&self, features: &[f32]) -> Result<Vec<f32>> {
        if features.len() != self.mean.len() {
            return Err(Error::FeatureShapeMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }
}
