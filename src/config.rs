//! Configuration management for the ASL recognition application

use crate::{
    cascade::{AmbiguitySets, CascadeController},
    constants::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_CROP_PADDING},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model artifact paths
    pub models: ModelConfig,

    /// Hand detection parameters
    pub detection: DetectionConfig,

    /// Cascade parameters
    pub cascade: CascadeConfig,

    /// Hand-crop parameters
    pub crop: CropConfig,

    /// Flex-sensor glove path
    pub sensor: SensorConfig,

    /// Display and overlay settings
    pub display: DisplayConfig,

    /// Audio lookup settings
    pub audio: AudioConfig,
}

/// Model artifact paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the hand-landmark ONNX model
    pub hand_landmarks: PathBuf,

    /// Path to the primary letter ONNX model
    pub letter_model: PathBuf,

    /// Path to the fitted feature-scaler parameters (JSON)
    pub scaler: PathBuf,

    /// Path to the primary label encoder (JSON)
    pub label_encoder: PathBuf,

    /// Path to the closed-fist refiner ONNX model
    pub closed_fist_refiner: PathBuf,

    /// Path to the closed-fist refiner label encoder (JSON)
    pub closed_fist_labels: PathBuf,

    /// Path to the B/W refiner ONNX model
    pub bw_refiner: PathBuf,
}

/// Hand detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum hand-presence score to accept a detection (0.0-1.0)
    pub min_confidence: f32,
}

/// Cascade parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Confidence below which ambiguous predictions are refined (0.0-1.0)
    pub confidence_threshold: f32,

    /// Labels handled by the closed-fist refiner
    pub closed_fist_set: Vec<char>,

    /// Labels handled by the B/W refiner
    pub bw_set: Vec<char>,
}

/// Hand-crop parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropConfig {
    /// Bounding-box padding as a fraction of frame dimensions
    pub padding: f32,
}

/// Flex-sensor glove configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Enable the sensor classification path
    pub enabled: bool,

    /// Path to the glove ONNX model
    pub model: PathBuf,

    /// Path to the glove class list (JSON)
    pub classes: PathBuf,

    /// Optional fitted normalization parameters; ÷1024 fallback when absent
    pub scaler: Option<PathBuf>,
}

/// Display and overlay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Mirror the frame horizontally before estimation
    pub flip_horizontal: bool,

    /// Draw landmark points on the frame
    pub draw_landmarks: bool,

    /// Draw the confidence bar under the prediction
    pub draw_confidence_bar: bool,
}

/// Audio lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Announce predictions by resolving letter audio files
    pub enabled: bool,

    /// Directory holding per-letter audio files
    pub directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            detection: DetectionConfig::default(),
            cascade: CascadeConfig::default(),
            crop: CropConfig::default(),
            sensor: SensorConfig::default(),
            display: DisplayConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hand_landmarks: PathBuf::from("assets/hand_landmarks.onnx"),
            letter_model: PathBuf::from("assets/asl_letter_model_v3.onnx"),
            scaler: PathBuf::from("assets/scaler_v3.json"),
            label_encoder: PathBuf::from("assets/label_encoder_v3.json"),
            closed_fist_refiner: PathBuf::from("assets/closed_fist_refiner.onnx"),
            closed_fist_labels: PathBuf::from("assets/closed_fist_labels.json"),
            bw_refiner: PathBuf::from("assets/bw_refiner.onnx"),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { min_confidence: 0.5 }
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        let sets = AmbiguitySets::default();
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            closed_fist_set: sets.closed_fist_labels().to_vec(),
            bw_set: sets.bw_labels().to_vec(),
        }
    }
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_CROP_PADDING,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: PathBuf::from("assets/glove_cnn_model.onnx"),
            classes: PathBuf::from("assets/classes.json"),
            scaler: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            flip_horizontal: true,
            draw_landmarks: true,
            draw_confidence_bar: true,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from("assets/audio"),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Build the cascade controller from configuration
    pub fn cascade_controller(&self) -> Result<CascadeController> {
        let sets = AmbiguitySets::new(self.cascade.closed_fist_set.clone(), self.cascade.bw_set.clone())?;
        Ok(CascadeController::new(sets, self.cascade.confidence_threshold))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate thresholds
        if !(0.0..=1.0).contains(&self.cascade.confidence_threshold) {
            return Err(Error::ConfigError(
                "Confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detection.min_confidence) {
            return Err(Error::ConfigError(
                "Detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.crop.padding) {
            return Err(Error::ConfigError(
                "Crop padding must be between 0.0 and 1.0".to_string(),
            ));
        }

        // The ambiguity sets must be disjoint
        AmbiguitySets::new(self.cascade.closed_fist_set.clone(), self.cascade.bw_set.clone())?;

        // Validate model paths exist
        for (path, what) in [
            (&self.models.hand_landmarks, "Hand landmark model"),
            (&self.models.letter_model, "Letter model"),
            (&self.models.scaler, "Feature scaler"),
            (&self.models.label_encoder, "Label encoder"),
            (&self.models.closed_fist_refiner, "Closed-fist refiner"),
            (&self.models.closed_fist_labels, "Closed-fist label encoder"),
            (&self.models.bw_refiner, "B/W refiner"),
        ] {
            if !path.exists() {
                return Err(Error::ConfigError(format!("{what} not found: {}", path.display())));
            }
        }

        if self.sensor.enabled {
            if !self.sensor.model.exists() {
                return Err(Error::ConfigError(format!(
                    "Glove model not found: {}",
                    self.sensor.model.display()
                )));
            }
            if !self.sensor.classes.exists() {
                return Err(Error::ConfigError(format!(
                    "Glove class list not found: {}",
                    self.sensor.classes.display()
                )));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# ASL Letter Recognition Configuration

# Model artifact paths
models:
  hand_landmarks: "assets/hand_landmarks.onnx"
  letter_model: "assets/asl_letter_model_v3.onnx"
  scaler: "assets/scaler_v3.json"
  label_encoder: "assets/label_encoder_v3.json"
  closed_fist_refiner: "assets/closed_fist_refiner.onnx"
  closed_fist_labels: "assets/closed_fist_labels.json"
  bw_refiner: "assets/bw_refiner.onnx"

# Hand detection
detection:
  min_confidence: 0.5

# Cascade parameters
cascade:
  confidence_threshold: 0.9
  closed_fist_set: [A, E, O, S, M, N, T]
  bw_set: [B, W]

# Hand-crop parameters
crop:
  padding: 0.2

# Flex-sensor glove
sensor:
  enabled: false
  model: "assets/glove_cnn_model.onnx"
  classes: "assets/classes.json"
  scaler: null

# Display settings
display:
  flip_horizontal: true
  draw_landmarks: true
  draw_confidence_bar: true

# Audio lookup
audio:
  enabled: false
  directory: "assets/audio"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_pipeline_constants() {
        let config = Config::default();
        assert!((config.cascade.confidence_threshold - 0.9).abs() < f32::EPSILON);
        assert!((config.crop.padding - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.cascade.closed_fist_set, vec!['A', 'E', 'O', 'S', 'M', 'N', 'T']);
        assert_eq!(config.cascade.bw_set, vec!['B', 'W']);
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert!((config.cascade.confidence_threshold - 0.9).abs() < f32::EPSILON);
        assert!(!config.sensor.enabled);
        assert!(config.display.flip_horizontal);
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut config = Config::default();
        config.cascade.confidence_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.crop.padding = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cascade.bw_set = vec!['B', 'S'];
        // 'S' is already a closed-fist label
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlapping_sets_rejected_by_controller_builder() {
        let mut config = Config::default();
        config.cascade.closed_fist_set.push('B');
        assert!(config.cascade_controller().is_err());
    }
}
