//! Geometric feature derivation from hand landmarks.
//!
//! The primary model consumes a 79-value vector: the 63 flattened world
//! coordinates, 10 joint angles, 5 fingertip-to-wrist distances, and the
//! convex-hull area of the hand silhouette. Angles and distances come from
//! the world-space set; the hull area is the one feature drawn from the
//! image-space set, capturing silhouette spread independent of world scale.

use crate::{
    constants::{ANGLE_EPSILON, FEATURE_VECTOR_LEN, NUM_JOINT_ANGLES, NUM_TIP_DISTANCES},
    landmarks::{HandLandmarks, LandmarkSet, FINGER_JOINT_TRIPLES},
    Result,
};
use opencv::core::{Point, Vector};
use opencv::imgproc;

/// Compute 2 joint angles per finger from world landmarks, in degrees.
///
/// The angle at joint `b` of a triple `(a, b, c)` is measured between the
/// vectors `a - b` and `c - b`. The cosine is clamped to [-1, 1] before
/// `acos` to guard against floating-point overshoot, and an epsilon in the
/// denominator guards against zero-length vectors from degenerate or
/// duplicated landmarks.
#[must_use]
pub fn joint_angles(world: &LandmarkSet) -> [f32; NUM_JOINT_ANGLES] {
    let mut angles = [0.0f32; NUM_JOINT_ANGLES];
    let mut i = 0;
    for finger in &FINGER_JOINT_TRIPLES {
        for &(a, b, c) in finger {
            let v1 = world[a].sub(&world[b]);
            let v2 = world[c].sub(&world[b]);
            let cos = v1.dot(&v2) / (v1.norm() * v2.norm() + ANGLE_EPSILON);
            angles[i] = cos.clamp(-1.0, 1.0).acos().to_degrees();
            i += 1;
        }
    }
    angles
}

/// Euclidean distance from each fingertip to the wrist, in world units.
///
/// Order matches the finger order of [`joint_angles`]: thumb, index, middle,
/// ring, pinky.
#[must_use]
pub fn tip_distances(world: &LandmarkSet) -> [f32; NUM_TIP_DISTANCES] {
    let wrist = world.wrist();
    let tips = world.fingertips();
    let mut distances = [0.0f32; NUM_TIP_DISTANCES];
    for (d, tip) in distances.iter_mut().zip(tips) {
        *d = tip.sub(wrist).norm();
    }
    distances
}

/// 2D convex-hull area of the hand projection, in pixel².
///
/// Image-space landmarks are projected to integer pixel coordinates
/// (truncated, not rounded, matching the training-time projection) before
/// the hull is computed. Collinear or single-point sets give area 0.
///
/// # Errors
///
/// Returns an error if the hull or area computation fails.
pub fn hull_area(image: &LandmarkSet, frame_width: i32, frame_height: i32) -> Result<f32> {
    #[allow(clippy::cast_possible_truncation)] // Truncation is the projection convention
    let pixels: Vector<Point> = image
        .points()
        .iter()
        .map(|p| {
            Point::new(
                (p.x * frame_width as f32) as i32,
                (p.y * frame_height as f32) as i32,
            )
        })
        .collect();

    let mut hull = Vector::<Point>::new();
    imgproc::convex_hull(&pixels, &mut hull, false, true)?;

    #[allow(clippy::cast_possible_truncation)] // Pixel areas fit f32 comfortably
    Ok(imgproc::contour_area(&hull, false)? as f32)
}

/// Build the full feature vector for one detected hand.
///
/// Layout: `[63 world coords, 10 angles, 5 distances, 1 hull area]`, always
/// exactly [`FEATURE_VECTOR_LEN`] values for a valid landmark pair. The
/// 21-point invariant is enforced by [`LandmarkSet`] construction, so no
/// count check is repeated here.
///
/// # Errors
///
/// Returns an error if the hull-area computation fails.
pub fn extract(hand: &HandLandmarks, frame_width: i32, frame_height: i32) -> Result<Vec<f32>> {
    let mut features = hand.world.to_flat();
    features.extend_from_slice(&joint_angles(&hand.world));
    features.extend_from_slice(&tip_distances(&hand.world));
    features.push(hull_area(&hand.image, frame_width, frame_height)?);

    debug_assert_eq!(features.len(), FEATURE_VECTOR_LEN);
    Ok(features)
}
