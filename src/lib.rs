//! Facecue - Webcam Presence Observer
//!
//! Watches face and hand landmarks streamed from a tracker subprocess and
//! reacts to what it sees:
//! - Greets a face when it appears and logs how long it stayed
//! - Recognizes smiles and simple hand gestures
//! - Mirrors presence on a serial LED and draws status text on the preview

pub mod classify;
pub mod config;
pub mod error;
pub mod observer;
pub mod output;
pub mod presence;
pub mod session;
pub mod tracking;

pub use config::Config;
pub use error::FacecueError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
