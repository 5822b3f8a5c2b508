//! Tracking module
//!
//! Face and hand landmarks from the MediaPipe tracker helper:
//! - landmark set types with fixed semantic indices
//! - JSON-over-UDP packet receiver
//! - helper subprocess management

pub mod landmarks;
pub mod receiver;
pub mod subprocess;

use crate::error::FacecueError;

pub use landmarks::{FaceLandmarks, HandLandmarks, LandmarkPoint};
pub use receiver::{Frame, LandmarkReceiver};
pub use subprocess::TrackerSubprocess;

/// What the tracker produced since the last call
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerMessage {
    /// Detection result for one camera frame
    Frame(Frame),
    /// The user asked the helper to stop (`q` in the display window)
    Quit,
}

/// Per-frame landmark provider
#[allow(async_fn_in_trait)]
pub trait LandmarkSource {
    /// Wait for the next message, or `None` if nothing arrived in time
    async fn next_message(&mut self) -> Result<Option<TrackerMessage>, FacecueError>;
}
