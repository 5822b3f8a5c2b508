//! Smile detection from face mesh mouth geometry

use std::cmp::Ordering;

use crate::tracking::landmarks::{face, FaceLandmarks};

/// Lip gap must exceed this fraction of the mouth width (strictly)
pub const SMILE_RATIO_THRESHOLD: f32 = 0.3;

/// Mouth widths at or below this many pixels are treated as degenerate
const MIN_MOUTH_WIDTH_PX: f32 = f32::EPSILON;

/// Ratio-threshold smile classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionClassifier {
    threshold: f32,
}

impl Default for ExpressionClassifier {
    fn default() -> Self {
        Self {
            threshold: SMILE_RATIO_THRESHOLD,
        }
    }
}

impl ExpressionClassifier {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Whether the face is smiling in a `width` x `height` frame.
    ///
    /// Compares the vertical inner-lip gap against the horizontal distance
    /// between the mouth corners, both in pixels. A zero, negative or
    /// non-finite mouth width is never smiling.
    pub fn is_smiling(&self, face: &FaceLandmarks, width: f32, height: f32) -> bool {
        let upper = face.point(face::UPPER_INNER_LIP);
        let lower = face.point(face::LOWER_INNER_LIP);
        let left = face.point(face::LEFT_MOUTH_CORNER);
        let right = face.point(face::RIGHT_MOUTH_CORNER);

        let lip_gap = (lower.y - upper.y) * height;
        let mouth_width = (right.x - left.x) * width;

        // NaN compares as None
        if mouth_width.partial_cmp(&MIN_MOUTH_WIDTH_PX) != Some(Ordering::Greater) {
            return false;
        }

        lip_gap / mouth_width > self.threshold
    }
}

/// [`ExpressionClassifier::is_smiling`] with the default threshold
pub fn is_smiling(face: &FaceLandmarks, width: f32, height: f32) -> bool {
    ExpressionClassifier::default().is_smiling(face, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::landmarks::LandmarkPoint;

    /// Neutral mesh with only the four mouth anchors placed
    fn mouth(upper_y: f32, lower_y: f32, left_x: f32, right_x: f32) -> FaceLandmarks {
        let mut points = vec![LandmarkPoint::new(0.5, 0.5); face::MIN_POINTS];
        points[face::UPPER_INNER_LIP] = LandmarkPoint::new(0.5, upper_y);
        points[face::LOWER_INNER_LIP] = LandmarkPoint::new(0.5, lower_y);
        points[face::LEFT_MOUTH_CORNER] = LandmarkPoint::new(left_x, 0.6);
        points[face::RIGHT_MOUTH_CORNER] = LandmarkPoint::new(right_x, 0.6);
        FaceLandmarks::new(points).unwrap()
    }

    #[test]
    fn test_open_mouth_is_smiling() {
        // gap 0.05 * 480 = 24px, width 0.1 * 640 = 64px, ratio 0.375
        let face = mouth(0.60, 0.65, 0.45, 0.55);
        assert!(is_smiling(&face, 640.0, 480.0));
    }

    #[test]
    fn test_closed_mouth_is_neutral() {
        // gap 0.01 * 480 = 4.8px, width 64px, ratio 0.075
        let face = mouth(0.60, 0.61, 0.45, 0.55);
        assert!(!is_smiling(&face, 640.0, 480.0));
    }

    #[test]
    fn test_exact_threshold_is_not_smiling() {
        let face = mouth(0.0, 0.3, 0.0, 1.0);
        assert!(!is_smiling(&face, 1.0, 1.0));

        let face = mouth(0.0, 0.31, 0.0, 1.0);
        assert!(is_smiling(&face, 1.0, 1.0));
    }

    #[test]
    fn test_zero_mouth_width_is_not_smiling() {
        let face = mouth(0.60, 0.70, 0.5, 0.5);
        assert!(!is_smiling(&face, 640.0, 480.0));

        // Degenerate frame width collapses the mouth as well
        let face = mouth(0.60, 0.70, 0.45, 0.55);
        assert!(!is_smiling(&face, 0.0, 480.0));
    }

    #[test]
    fn test_inverted_corners_are_not_smiling() {
        let face = mouth(0.70, 0.60, 0.55, 0.45);
        assert!(!is_smiling(&face, 640.0, 480.0));
    }

    #[test]
    fn test_nan_mouth_width_is_not_smiling() {
        let face = mouth(0.60, 0.70, f32::NAN, 0.55);
        assert!(!is_smiling(&face, 640.0, 480.0));
    }

    #[test]
    fn test_custom_threshold() {
        let face = mouth(0.60, 0.65, 0.45, 0.55);
        assert!(!ExpressionClassifier::new(0.5).is_smiling(&face, 640.0, 480.0));
        assert!(ExpressionClassifier::new(0.2).is_smiling(&face, 640.0, 480.0));
    }
}
