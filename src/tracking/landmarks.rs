//! Landmark sets reported by the MediaPipe face mesh and hand detectors
//!
//! Points are normalized to `[0, 1]` relative to the frame, with `y` growing
//! downwards (smaller `y` is higher in the image). Both set types are only
//! constructed through length-checked constructors, so the classifiers can
//! index the semantic anchors directly.

use serde::{Deserialize, Serialize};

/// A single normalized 2-D landmark
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for LandmarkPoint {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<LandmarkPoint> for [f32; 2] {
    fn from(p: LandmarkPoint) -> Self {
        [p.x, p.y]
    }
}

/// Fixed face mesh indices
pub mod face {
    /// Minimum number of points in a face mesh
    pub const MIN_POINTS: usize = 468;

    pub const UPPER_INNER_LIP: usize = 13;
    pub const LOWER_INNER_LIP: usize = 14;
    pub const LEFT_MOUTH_CORNER: usize = 61;
    pub const RIGHT_MOUTH_CORNER: usize = 291;
}

/// Fixed hand landmark indices
pub mod hand {
    /// Exact number of points in a hand
    pub const POINTS: usize = 21;

    pub const WRIST: usize = 0;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;

    // Curl references. MediaPipe names these joints PIP; the extension
    // checks treat them as the finger's knuckle.
    pub const INDEX_MCP: usize = 6;
    pub const MIDDLE_MCP: usize = 10;
    pub const RING_MCP: usize = 14;
    pub const PINKY_MCP: usize = 18;
}

/// Face mesh for one detected face (at least 468 points)
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<LandmarkPoint>,
}

impl FaceLandmarks {
    /// Wrap a face mesh, or `None` if it is too short to hold the mouth anchors
    pub fn new(points: Vec<LandmarkPoint>) -> Option<Self> {
        (points.len() >= face::MIN_POINTS).then_some(Self { points })
    }

    pub fn point(&self, index: usize) -> LandmarkPoint {
        self.points[index]
    }
}

/// Landmarks for one detected hand (exactly 21 points)
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [LandmarkPoint; hand::POINTS],
    handedness: Option<String>,
}

impl HandLandmarks {
    /// Wrap a hand, or `None` unless exactly 21 points are given
    pub fn new(points: &[LandmarkPoint], handedness: Option<String>) -> Option<Self> {
        let points: [LandmarkPoint; hand::POINTS] = points.try_into().ok()?;
        Some(Self { points, handedness })
    }

    pub fn point(&self, index: usize) -> LandmarkPoint {
        self.points[index]
    }

    /// "Left" / "Right" as reported by the detector, if any
    pub fn handedness(&self) -> Option<&str> {
        self.handedness.as_deref()
    }

    pub fn wrist(&self) -> LandmarkPoint {
        self.points[hand::WRIST]
    }

    pub fn thumb_ip(&self) -> LandmarkPoint {
        self.points[hand::THUMB_IP]
    }

    /// Tips in order: thumb, index, middle, ring, pinky
    pub fn fingertips(&self) -> [LandmarkPoint; 5] {
        [
            self.points[hand::THUMB_TIP],
            self.points[hand::INDEX_TIP],
            self.points[hand::MIDDLE_TIP],
            self.points[hand::RING_TIP],
            self.points[hand::PINKY_TIP],
        ]
    }
}
