//! Landmark classifiers
//!
//! Pure threshold rules over a single frame's landmarks:
//! - smile detection from the face mesh mouth anchors
//! - hand gesture recognition from fingertip/knuckle heights

pub mod expression;
pub mod gesture;

pub use expression::{is_smiling, ExpressionClassifier};
pub use gesture::{recognize_gesture, Gesture};
