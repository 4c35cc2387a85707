//! Hand landmark data model.
//!
//! A [`LandmarkSet`] is an ordered sequence of exactly 21 3D points with fixed
//! anatomical indexing: 0 is the wrist, 4/8/12/16/20 are the fingertips, and
//! each finger contributes a fixed run of joints in between. The pose
//! estimator produces two sets per detection: one in normalized image space
//! (x, y in [0, 1] relative to the frame, z relative depth) and one in metric,
//! wrist-relative world space.

use crate::{constants::NUM_HAND_LANDMARKS, Error, Result};

/// Fingertip landmark indices (thumb, index, middle, ring, pinky)
pub const FINGERTIP_INDICES: [usize; 5] = [4, 8, 12, 16, 20];

/// Joint triples used for angle computation, two per finger.
///
/// Each triple `(a, b, c)` names the landmarks around a joint; the angle is
/// measured at `b` between the vectors to `a` and `c`. Order: thumb, index,
/// middle, ring, pinky; within a finger, proximal then distal.
pub const FINGER_JOINT_TRIPLES: [[(usize, usize, usize); 2]; 5] = [
    [(1, 2, 3), (2, 3, 4)],
    [(5, 6, 7), (6, 7, 8)],
    [(9, 10, 11), (10, 11, 12)],
    [(13, 14, 15), (14, 15, 16)],
    [(17, 18, 19), (18, 19, 20)],
];

/// A single 3D landmark point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise difference `self - other`
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Dot product with another vector
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean norm
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }
}

/// An ordered set of exactly 21 hand landmarks
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Create a landmark set from 21 points
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLandmarkSet`] if the point count is not
    /// exactly 21. Sets are never truncated or padded.
    pub fn new(points: Vec<Landmark>) -> Result<Self> {
        if points.len() != NUM_HAND_LANDMARKS {
            return Err(Error::InvalidLandmarkSet {
                expected: NUM_HAND_LANDMARKS,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Create a landmark set from a flat `[x0, y0, z0, x1, ...]` buffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLandmarkSet`] if the buffer does not hold
    /// exactly 21 × 3 values.
    pub fn from_flat(values: &[f32]) -> Result<Self> {
        if values.len() != NUM_HAND_LANDMARKS * 3 {
            return Err(Error::InvalidLandmarkSet {
                expected: NUM_HAND_LANDMARKS,
                actual: values.len() / 3,
            });
        }
        let points = values
            .chunks_exact(3)
            .map(|c| Landmark::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self { points })
    }

    /// All 21 points in anatomical order
    #[must_use]
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// The wrist landmark
    #[must_use]
    pub fn wrist(&self) -> &Landmark {
        &self.points[crate::constants::WRIST_INDEX]
    }

    /// The five fingertip landmarks, thumb first
    #[must_use]
    pub fn fingertips(&self) -> [&Landmark; 5] {
        [
            &self.points[FINGERTIP_INDICES[0]],
            &self.points[FINGERTIP_INDICES[1]],
            &self.points[FINGERTIP_INDICES[2]],
            &self.points[FINGERTIP_INDICES[3]],
            &self.points[FINGERTIP_INDICES[4]],
        ]
    }

    /// Flatten to `[x0, y0, z0, x1, ...]` in landmark order
    #[must_use]
    pub fn to_flat(&self) -> Vec<f32> {
        self.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.points[index]
    }
}

/// The pair of landmark sets produced per detected hand.
///
/// `image` is in normalized image space, `world` in metric wrist-relative
/// space. Both index the same anatomy.
#[derive(Debug, Clone)]
pub struct HandLandmarks {
    pub image: LandmarkSet,
    pub world: LandmarkSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_count() {
        let points = vec![Landmark::default(); 20];
        match LandmarkSet::new(points) {
            Err(Error::InvalidLandmarkSet { expected, actual }) => {
                assert_eq!(expected, 21);
                assert_eq!(actual, 20);
            }
            other => panic!("expected InvalidLandmarkSet, got {other:?}"),
        }

        assert!(LandmarkSet::new(vec![Landmark::default(); 22]).is_err());
        assert!(LandmarkSet::new(vec![Landmark::default(); 21]).is_ok());
    }

    #[test]
    fn test_from_flat_round_trip() {
        let flat: Vec<f32> = (0..63).map(|i| i as f32 * 0.1).collect();
        let set = LandmarkSet::from_flat(&flat).unwrap();
        assert_eq!(set.points().len(), 21);
        assert_eq!(set.to_flat(), flat);

        // A short buffer is a wrong-count error, not a truncation
        assert!(LandmarkSet::from_flat(&flat[..60]).is_err());
    }

    #[test]
    fn test_anatomical_accessors() {
        let points: Vec<Landmark> = (0..21).map(|i| Landmark::new(i as f32, 0.0, 0.0)).collect();
        let set = LandmarkSet::new(points).unwrap();

        assert_eq!(set.wrist().x, 0.0);
        let tips = set.fingertips();
        assert_eq!(tips[0].x, 4.0);
        assert_eq!(tips[4].x, 20.0);
    }

    #[test]
    fn test_joint_triples_cover_all_fingers() {
        // Every triple must index within the set and center on its joint
        for finger in &FINGER_JOINT_TRIPLES {
            for &(a, b, c) in finger {
                assert!(a < NUM_HAND_LANDMARKS);
                assert!(b < NUM_HAND_LANDMARKS);
                assert!(c < NUM_HAND_LANDMARKS);
                assert_eq!(b, a + 1);
                assert_eq!(c, b + 1);
            }
        }
    }

    #[test]
    fn test_vector_ops() {
        let a = Landmark::new(1.0, 2.0, 2.0);
        let b = Landmark::new(0.0, 0.0, 0.0);
        assert_eq!(a.sub(&b).norm(), 3.0);
        assert_eq!(a.dot(&a), 9.0);
    }
}
