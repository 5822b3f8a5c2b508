//! Text-to-speech notifications
//!
//! Speech runs an external synthesizer (espeak-ng by default) and waits for
//! it to exit, so the frame loop is paused while a message plays.

use tokio::process::Command;

use crate::config::SpeechConfig;
use crate::error::{FacecueError, SpeechError};

/// Speaks a text message, returning once it has been spoken
#[allow(async_fn_in_trait)]
pub trait NotificationSink {
    async fn speak(&mut self, text: &str) -> Result<(), FacecueError>;
}

/// Speaks through a command-line synthesizer
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    command: String,
    rate: u32,
    amplitude: u32,
}

impl CommandSpeaker {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            command: config.command.clone(),
            rate: config.rate,
            amplitude: volume_to_amplitude(config.volume),
        }
    }

    /// Arguments for one utterance
    pub fn args(&self, text: &str) -> Vec<String> {
        vec![
            "-s".to_string(),
            self.rate.to_string(),
            "-a".to_string(),
            self.amplitude.to_string(),
            text.to_string(),
        ]
    }
}

/// espeak amplitude runs 0-200
fn volume_to_amplitude(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * 200.0).round() as u32
}

impl NotificationSink for CommandSpeaker {
    async fn speak(&mut self, text: &str) -> Result<(), FacecueError> {
        let status = Command::new(&self.command)
            .args(self.args(text))
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| SpeechError::Launch {
                command: self.command.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(SpeechError::Failed(status.to_string()).into());
        }

        Ok(())
    }
}

/// Drops every message; used when speech is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct Muted;

impl NotificationSink for Muted {
    async fn speak(&mut self, text: &str) -> Result<(), FacecueError> {
        tracing::debug!("Speech disabled, not saying: {}", text);
        Ok(())
    }
}

/// Either synthesizer, chosen at startup
#[derive(Debug, Clone)]
pub enum Speaker {
    Command(CommandSpeaker),
    Muted(Muted),
}

impl Speaker {
    pub fn from_config(config: &SpeechConfig) -> Self {
        if config.enabled {
            Self::Command(CommandSpeaker::new(config))
        } else {
            Self::Muted(Muted)
        }
    }
}

impl NotificationSink for Speaker {
    async fn speak(&mut self, text: &str) -> Result<(), FacecueError> {
        match self {
            Self::Command(s) => s.speak(text).await,
            Self::Muted(s) => s.speak(text).await,
        }
    }
}
