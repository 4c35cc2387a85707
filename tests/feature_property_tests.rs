//! Property-based tests for the geometric feature extractor

use asl_recognition::{
    constants::FEATURE_VECTOR_LEN,
    cropper::hand_bounding_box,
    features::{extract, hull_area, joint_angles},
    landmarks::{HandLandmarks, Landmark, LandmarkSet},
};
use proptest::prelude::*;

fn arb_landmark() -> impl Strategy<Value = Landmark> {
    (-5.0f32..5.0, -5.0f32..5.0, -5.0f32..5.0).prop_map(|(x, y, z)| Landmark::new(x, y, z))
}

fn arb_landmark_set() -> impl Strategy<Value = LandmarkSet> {
    proptest::collection::vec(arb_landmark(), 21).prop_map(|points| LandmarkSet::new(points).unwrap())
}

/// Landmark sets whose adjacent joints keep a healthy separation, so the
/// epsilon in the angle denominator stays far below the vector norms
fn arb_separated_set() -> impl Strategy<Value = LandmarkSet> {
    proptest::collection::vec((-0.3f32..0.3, -0.3f32..0.3, -0.3f32..0.3), 21).prop_map(|jitter| {
        let points = jitter
            .into_iter()
            .enumerate()
            .map(|(i, (dx, dy, dz))| Landmark::new(i as f32 + dx, dy, dz))
            .collect();
        LandmarkSet::new(points).unwrap()
    })
}

fn arb_image_set() -> impl Strategy<Value = LandmarkSet> {
    proptest::collection::vec(
        (0.0f32..1.0, 0.0f32..1.0).prop_map(|(x, y)| Landmark::new(x, y, 0.0)),
        21,
    )
    .prop_map(|points| LandmarkSet::new(points).unwrap())
}

proptest! {
    #[test]
    fn prop_feature_vector_length_is_always_79(world in arb_landmark_set(), image in arb_image_set()) {
        let hand = HandLandmarks { image, world };
        let features = extract(&hand, 640, 480).unwrap();
        prop_assert_eq!(features.len(), FEATURE_VECTOR_LEN);
        prop_assert_eq!(features.len(), 79);
    }

    #[test]
    fn prop_angles_are_finite_and_in_range(world in arb_landmark_set()) {
        for angle in joint_angles(&world) {
            prop_assert!(angle.is_finite());
            prop_assert!((0.0..=180.0).contains(&angle));
        }
    }

    #[test]
    fn prop_angles_invariant_under_uniform_scaling(world in arb_separated_set(), k in 0.5f32..20.0) {
        let scaled = LandmarkSet::new(
            world.points().iter().map(|p| Landmark::new(p.x * k, p.y * k, p.z * k)).collect(),
        )
        .unwrap();

        let base = joint_angles(&world);
        let after = joint_angles(&scaled);
        for (a, b) in base.iter().zip(after.iter()) {
            // The epsilon guard bounds the deviation; it never flips a pose
            prop_assert!((a - b).abs() < 0.5, "angle moved {a} -> {b} under k={k}");
        }
    }

    #[test]
    fn prop_hull_area_is_nonnegative(image in arb_image_set()) {
        let area = hull_area(&image, 640, 480).unwrap();
        prop_assert!(area >= 0.0);
    }

    #[test]
    fn prop_bounding_box_is_ordered_and_clamped(image in arb_image_set(), pad in 0.0f32..0.5) {
        let bbox = hand_bounding_box(&image, 640, 480, pad);
        prop_assert!(bbox.x1 <= bbox.x2);
        prop_assert!(bbox.y1 <= bbox.y2);
        prop_assert!(bbox.x1 >= 0 && bbox.x2 <= 640);
        prop_assert!(bbox.y1 >= 0 && bbox.y2 <= 480);
    }
}

#[test]
fn test_single_point_hull_has_zero_area() {
    let set = LandmarkSet::new(vec![Landmark::new(0.5, 0.5, 0.0); 21]).unwrap();
    assert_eq!(hull_area(&set, 640, 480).unwrap(), 0.0);
}
