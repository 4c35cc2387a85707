//! Constants used throughout the application

/// Number of hand landmarks produced by the pose estimator
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Index of the wrist landmark
pub const WRIST_INDEX: usize = 0;

/// Number of flattened world coordinates (21 points × 3 dimensions)
pub const LANDMARK_COORDS_LEN: usize = NUM_HAND_LANDMARKS * 3;

/// Number of joint angles in the feature vector (2 per finger)
pub const NUM_JOINT_ANGLES: usize = 10;

/// Number of fingertip-to-wrist distances in the feature vector
pub const NUM_TIP_DISTANCES: usize = 5;

/// Total feature vector length expected by the primary model
pub const FEATURE_VECTOR_LEN: usize = LANDMARK_COORDS_LEN + NUM_JOINT_ANGLES + NUM_TIP_DISTANCES + 1;

/// Epsilon added to vector-norm denominators in angle computation
pub const ANGLE_EPSILON: f32 = 1e-6;

/// Confidence below which ambiguous primary predictions are refined
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.9;

/// Padding added to the hand bounding box, as a fraction of frame dimensions
pub const DEFAULT_CROP_PADDING: f32 = 0.2;

/// Side length of the square crop fed to the region refiners
pub const REFINER_INPUT_SIZE: i32 = 128;

/// Pixel value divisor mapping u8 images into [0, 1]
pub const PIXEL_NORMALIZATION_SCALE: f32 = 255.0;

/// Decision boundary for the binary B/W refiner output
pub const BW_DECISION_BOUNDARY: f32 = 0.5;

/// Number of flex sensors on the glove (thumb, index, middle, ring, pinky)
pub const NUM_FLEX_SENSORS: usize = 5;

/// Fallback divisor mapping raw analog sensor readings into roughly [0, 1]
pub const SENSOR_FALLBACK_SCALE: f32 = 1024.0;

/// Number of letters in the index-to-letter fallback mapping
pub const ALPHABET_LEN: usize = 26;

/// Sentinel label reported when a class index has no letter mapping
pub const UNKNOWN_LABEL: char = '?';
