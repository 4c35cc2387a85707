//! Hand-region extraction for the image-based refiners.
//!
//! The refiners accept exactly one input shape: a 128×128 three-channel crop
//! of the hand, as float32 in [0, 1]. This module derives the padded pixel bounding
//! box from image-space landmarks and produces that crop from the raw frame.
//! A hand near the frame edge can produce a degenerate (zero-area) box; that
//! case is represented explicitly so the cascade can fall back instead of
//! failing.

use crate::{
    constants::{PIXEL_NORMALIZATION_SCALE, REFINER_INPUT_SIZE},
    landmarks::LandmarkSet,
    Error, Result,
};
use opencv::core::{Mat, Rect, Size, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;

/// Padded pixel rectangle around the detected hand.
///
/// Corners satisfy `x1 <= x2` and `y1 <= y2`; both are clamped to the frame.
/// The box may be empty when the padded region falls outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    #[must_use]
    pub fn width(&self) -> i32 {
        (self.x2 - self.x1).max(0)
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        (self.y2 - self.y1).max(0)
    }

    /// True when the box encloses no pixels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Clamp a pixel coordinate into `[0, max]` and truncate
#[allow(clippy::cast_possible_truncation)] // Clamping makes truncation safe
fn clamp_pixel(value: f32, max: i32) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, max as f32) as i32
}

/// Compute the padded hand bounding box in pixel coordinates.
///
/// `pad` is a fraction of the frame dimensions added symmetrically to the
/// landmark extrema before clamping to `[0, width] × [0, height]`.
#[must_use]
pub fn hand_bounding_box(image: &LandmarkSet, frame_width: i32, frame_height: i32, pad: f32) -> BoundingBox {
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for p in image.points() {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let w = frame_width as f32;
    let h = frame_height as f32;

    BoundingBox {
        x1: clamp_pixel((min_x - pad) * w, frame_width),
        y1: clamp_pixel((min_y - pad) * h, frame_height),
        x2: clamp_pixel((max_x + pad) * w, frame_width),
        y2: clamp_pixel((max_y + pad) * h, frame_height),
    }
}

/// A 128×128×3 float crop in [0, 1], the only input the region refiners accept
#[derive(Debug, Clone, PartialEq)]
pub struct CropImage {
    data: Vec<f32>,
}

impl CropImage {
    /// Number of values in a crop tensor
    pub const LEN: usize = (REFINER_INPUT_SIZE as usize) * (REFINER_INPUT_SIZE as usize) * 3;

    /// Wrap raw HWC data, validating its length
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is not exactly 128 × 128 × 3 values.
    pub fn from_data(data: Vec<f32>) -> Result<Self> {
        if data.len() != Self::LEN {
            return Err(Error::InvalidInput(format!(
                "crop tensor must hold {} values, got {}",
                Self::LEN,
                data.len()
            )));
        }
        Ok(Self { data })
    }

    /// Raw values in HWC order
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Extract, resize, and normalize the hand region.
///
/// Returns `Ok(None)` when the box is empty; the caller decides how to
/// degrade. This function never invents pixels.
///
/// # Errors
///
/// Returns an error if the `OpenCV` crop, resize, or conversion fails.
pub fn crop_region(frame: &Mat, bbox: &BoundingBox) -> Result<Option<CropImage>> {
    if bbox.is_empty() {
        return Ok(None);
    }

    let roi = Mat::roi(frame, Rect::new(bbox.x1, bbox.y1, bbox.width(), bbox.height()))?;
    let roi = roi.try_clone()?;

    let mut resized = Mat::default();
    imgproc::resize(
        &roi,
        &mut resized,
        Size::new(REFINER_INPUT_SIZE, REFINER_INPUT_SIZE),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    let mut float_image = Mat::default();
    resized.convert_to(&mut float_image, CV_32F, 1.0 / f64::from(PIXEL_NORMALIZATION_SCALE), 0.0)?;

    let size = REFINER_INPUT_SIZE as usize;
    let mut data = vec![0.0f32; CropImage::LEN];

    for row in 0..size {
        for col in 0..size {
            #[allow(clippy::cast_possible_truncation)] // size is 128
            let pixel = *float_image.at_2d::<opencv::core::Vec3f>(row as i32, col as i32)?;
            let base = (row * size + col) * 3;
            data[base] = pixel[0];
            data[base + 1] = pixel[1];
            data[base + 2] = pixel[2];
        }
    }

    Ok(Some(CropImage { data }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;

    fn centered_hand() -> LandmarkSet {
        // Landmarks spanning [0.4, 0.6] in both axes
        let points: Vec<Landmark> = (0..21)
            .map(|i| {
                let t = i as f32 / 20.0;
                Landmark::new(0.4 + 0.2 * t, 0.4 + 0.2 * (1.0 - t), 0.0)
            })
            .collect();
        LandmarkSet::new(points).unwrap()
    }

    #[test]
    fn test_bbox_padding_and_bounds() {
        let set = centered_hand();
        let bbox = hand_bounding_box(&set, 640, 480, 0.2);

        // (0.4 - 0.2) * 640 = 128, (0.6 + 0.2) * 640 = 512
        assert_eq!(bbox.x1, 128);
        assert_eq!(bbox.x2, 512);
        // (0.4 - 0.2) * 480 = 96, (0.6 + 0.2) * 480 = 384
        assert_eq!(bbox.y1, 96);
        assert_eq!(bbox.y2, 384);
        assert!(!bbox.is_empty());
    }

    #[test]
    fn test_bbox_clamps_to_frame() {
        // Hand at the very top-left corner
        let points: Vec<Landmark> = (0..21).map(|i| Landmark::new(0.01, 0.01 + 0.001 * i as f32, 0.0)).collect();
        let set = LandmarkSet::new(points).unwrap();
        let bbox = hand_bounding_box(&set, 640, 480, 0.2);

        assert_eq!(bbox.x1, 0);
        assert_eq!(bbox.y1, 0);
        assert!(bbox.x2 <= 640);
        assert!(bbox.y2 <= 480);
        assert!(!bbox.is_empty());
    }

    #[test]
    fn test_bbox_degenerates_outside_frame() {
        // Landmarks entirely past the right edge; padding cannot bring the
        // box back inside, so it collapses against the frame bound
        let points: Vec<Landmark> = (0..21).map(|i| Landmark::new(1.5 + 0.01 * i as f32, 0.5, 0.0)).collect();
        let set = LandmarkSet::new(points).unwrap();
        let bbox = hand_bounding_box(&set, 640, 480, 0.2);

        assert_eq!(bbox.width(), 0);
        assert!(bbox.is_empty());
    }

    #[test]
    fn test_crop_of_empty_box_is_none() {
        let frame = Mat::new_rows_cols_with_default(480, 640, opencv::core::CV_8UC3, opencv::core::Scalar::all(10.0))
            .unwrap();
        let empty = BoundingBox { x1: 640, y1: 100, x2: 640, y2: 200 };
        assert!(crop_region(&frame, &empty).unwrap().is_none());
    }

    #[test]
    fn test_crop_shape_and_range() {
        let frame = Mat::new_rows_cols_with_default(480, 640, opencv::core::CV_8UC3, opencv::core::Scalar::all(128.0))
            .unwrap();
        let bbox = BoundingBox { x1: 100, y1: 100, x2: 300, y2: 260 };

        let crop = crop_region(&frame, &bbox).unwrap().expect("non-empty crop");
        assert_eq!(crop.as_slice().len(), CropImage::LEN);
        for &v in crop.as_slice() {
            assert!((0.0..=1.0).contains(&v));
            assert!((v - 128.0 / 255.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_crop_image_validates_length() {
        assert!(CropImage::from_data(vec![0.0; CropImage::LEN]).is_ok());
        assert!(CropImage::from_data(vec![0.0; 100]).is_err());
    }
}
