//! On-frame overlay text
//!
//! The tracker helper draws the landmarks itself; this is the text layer the
//! observer contributes for each frame.

use serde::Serialize;

use crate::error::FacecueError;

/// OpenCV-style BGR colour
pub type Bgr = [u8; 3];

pub const GREEN: Bgr = [0, 255, 0];
pub const RED: Bgr = [0, 0, 255];
pub const MAGENTA: Bgr = [255, 0, 255];

/// Baseline rows (pixels from the top) for each overlay slot
pub const EXPRESSION_ROW: u32 = 50;
pub const GESTURE_ROW: u32 = 100;
pub const TIMER_ROW: u32 = 150;

/// One line of text drawn at the left margin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayLine {
    pub text: String,
    pub row: u32,
    pub color: Bgr,
}

impl OverlayLine {
    pub fn new(text: impl Into<String>, row: u32, color: Bgr) -> Self {
        Self {
            text: text.into(),
            row,
            color,
        }
    }
}

/// Overlay for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub frame: u64,
    pub lines: Vec<OverlayLine>,
}

impl Overlay {
    pub fn new(frame: u64) -> Self {
        Self {
            frame,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: OverlayLine) {
        self.lines.push(line);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Renders overlays
pub trait OverlaySink {
    fn render(&mut self, overlay: &Overlay) -> Result<(), FacecueError>;
}
