//! Error types for facecue

use thiserror::Error;

/// Main error type for facecue
#[derive(Error, Debug)]
pub enum FacecueError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Event log error: {0}")]
    Log(#[from] LogError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Landmark tracker errors (UDP receiver + helper subprocess)
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Landmark receiver error: {0}")]
    Receiver(String),

    #[error("Landmark packet parse error: {0}")]
    Parse(String),

    #[error("Tracker subprocess error: {0}")]
    Subprocess(String),

    #[error("Overlay send error: {0}")]
    Overlay(String),
}

/// Text-to-speech errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Failed to launch speech command '{command}': {message}")]
    Launch { command: String, message: String },

    #[error("Speech command exited with {0}")]
    Failed(String),
}

/// Serial indicator errors
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Failed to open serial port {port}: {message}")]
    Open { port: String, message: String },

    #[error("Serial write failed: {0}")]
    Write(String),
}

/// Presence event log errors
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to create event log {path}: {message}")]
    Create { path: String, message: String },

    #[error("Failed to append to event log: {0}")]
    Append(String),
}
