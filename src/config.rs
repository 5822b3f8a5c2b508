//! Configuration parsing and management for facecue

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::classify::expression::SMILE_RATIO_THRESHOLD;
use crate::error::{ConfigError, FacecueError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub expression: ExpressionConfig,
    pub gesture: GestureConfig,
    pub presence: PresenceConfig,
    pub speech: SpeechConfig,
    pub device: DeviceConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FacecueError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(s: &str) -> Result<Self, FacecueError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, FacecueError> {
        let paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), FacecueError> {
        if self.tracker.port == 0 {
            return Err(invalid("tracker.port", "Port must be greater than 0"));
        }

        if self.tracker.recv_timeout_ms == 0 {
            return Err(invalid(
                "tracker.recv_timeout_ms",
                "Receive timeout must be greater than 0",
            ));
        }

        if self.tracker.auto_launch {
            let path = Path::new(&self.tracker.tracker_script);
            if !path.exists() {
                tracing::warn!(
                    "Tracker auto_launch enabled but script not found at: {}",
                    self.tracker.tracker_script
                );
            }
        }

        if self.expression.smile_threshold.partial_cmp(&0.0) != Some(Ordering::Greater) {
            return Err(invalid(
                "expression.smile_threshold",
                "Threshold must be greater than 0.0",
            ));
        }

        if self.presence.enabled && self.presence.messages.is_empty() {
            return Err(invalid(
                "presence.messages",
                "At least one greeting message is required",
            ));
        }

        if self.speech.command.trim().is_empty() {
            return Err(invalid("speech.command", "Speech command must not be empty"));
        }

        if !(0.0..=1.0).contains(&self.speech.volume) {
            return Err(invalid("speech.volume", "Volume must be between 0.0 and 1.0"));
        }

        if self.device.baud_rate == 0 {
            return Err(invalid("device.baud_rate", "Baud rate must be greater than 0"));
        }

        if self.log.path.as_os_str().is_empty() {
            return Err(invalid("log.path", "Log path must not be empty"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> FacecueError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

/// Landmark tracker helper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Listen address for the UDP socket
    pub listen_address: String,
    /// UDP port to receive landmark packets on
    pub port: u16,
    /// Auto-launch the Python tracker subprocess
    pub auto_launch: bool,
    /// Path to landmark_tracker.py
    pub tracker_script: String,
    /// Camera device index
    pub camera_device: u32,
    /// Camera capture width
    pub capture_width: u32,
    /// Camera capture height
    pub capture_height: u32,
    /// Maximum number of hands the detector reports
    pub max_hands: u32,
    /// How long to wait for a packet before yielding "no frame"
    pub recv_timeout_ms: u64,
    /// Stop the loop on the first camera read failure instead of skipping it
    pub stop_on_capture_failure: bool,
    /// Auto-restart subprocess on crash
    pub auto_restart: bool,
    /// Delay before restarting crashed subprocess (seconds)
    pub restart_delay_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            listen_address: "127.0.0.1".to_string(),
            port: 12346,
            auto_launch: true,
            tracker_script: "scripts/landmark_tracker.py".to_string(),
            camera_device: 0,
            capture_width: 640,
            capture_height: 480,
            max_hands: 2,
            recv_timeout_ms: 500,
            stop_on_capture_failure: false,
            auto_restart: true,
            restart_delay_secs: 3,
        }
    }
}

/// Smile detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    pub enabled: bool,
    /// Lip gap / mouth width ratio that must be exceeded to count as smiling
    pub smile_threshold: f32,
    /// Spoken when the user starts smiling
    pub message: String,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            smile_threshold: SMILE_RATIO_THRESHOLD,
            message: "You look happy. It's great to see you smile!".to_string(),
        }
    }
}

/// Hand gesture recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub enabled: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Face presence timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub enabled: bool,
    /// One of these is spoken at random when a face appears
    pub messages: Vec<String>,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            messages: [
                "Wow! You have a wonderful presence!",
                "Hey there, you're looking great today!",
                "Keep smiling, the world needs your light!",
                "You're doing awesome just by being here!",
                "Your energy is truly inspiring!",
                "You have such a kind and friendly face!",
                "Keep being you! You're amazing!",
                "Wow, you light up the screen!",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Text-to-speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// Speech program; must accept `-s <wpm> -a <amplitude> <text>`
    pub command: String,
    /// Speaking rate in words per minute
    pub rate: u32,
    /// Volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "espeak-ng".to_string(),
            rate: 150,
            volume: 0.9,
        }
    }
}

/// Serial LED indicator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub enabled: bool,
    /// Serial port path
    pub port: String,
    pub baud_rate: u32,
    /// Wait after opening the port before the first write
    pub settle_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: "/dev/tty.usbmodem2101".to_string(),
            baud_rate: 9600,
            settle_ms: 2000,
        }
    }
}

/// Presence event log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// CSV file, recreated at startup
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("observer_log.csv"),
        }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("facecue");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/facecue");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/facecue");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("facecue");
        }
    }

    PathBuf::from(".")
}
