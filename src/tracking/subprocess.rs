//! Tracker subprocess manager
//!
//! Launches `scripts/landmark_tracker.py` as a child process. The helper owns
//! the camera and the display window; it is killed when the manager drops.

use tokio::process::{Child, Command};

use crate::config::TrackerConfig;
use crate::error::{FacecueError, TrackingError};

/// Manages the MediaPipe landmark tracker subprocess
pub struct TrackerSubprocess {
    child: Option<Child>,
    config: TrackerConfig,
}

impl TrackerSubprocess {
    /// Create a new subprocess manager (does not start the process)
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            child: None,
            config: config.clone(),
        }
    }

    /// Command line passed to `python3`
    pub fn args(&self) -> Vec<String> {
        vec![
            self.config.tracker_script.clone(),
            "--ip".to_string(),
            self.config.listen_address.clone(),
            "--port".to_string(),
            self.config.port.to_string(),
            "--capture".to_string(),
            self.config.camera_device.to_string(),
            "--width".to_string(),
            self.config.capture_width.to_string(),
            "--height".to_string(),
            self.config.capture_height.to_string(),
            "--max-hands".to_string(),
            self.config.max_hands.to_string(),
        ]
    }

    /// Launch the tracker subprocess
    pub fn start(&mut self) -> Result<(), FacecueError> {
        if self.is_running() {
            return Ok(());
        }

        let child = Command::new("python3")
            .args(self.args())
            .kill_on_drop(true)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .map_err(|e| {
                TrackingError::Subprocess(format!(
                    "Failed to launch tracker at '{}': {}",
                    self.config.tracker_script, e
                ))
            })?;

        tracing::info!(
            "Tracker subprocess started (pid: {:?}, camera: {}, port: {})",
            child.id(),
            self.config.camera_device,
            self.config.port,
        );

        self.child = Some(child);
        Ok(())
    }

    /// Check if the subprocess is still running (non-blocking).
    ///
    /// Returns the exit status the first time an exit is observed.
    pub fn poll_exit(&mut self) -> Option<std::process::ExitStatus> {
        let child = self.child.as_mut()?;
        match child.try_wait() {
            Ok(None) => None,
            Ok(Some(status)) => {
                tracing::warn!("Tracker subprocess exited with: {}", status);
                self.child = None;
                Some(status)
            }
            Err(e) => {
                tracing::error!("Failed to check tracker subprocess status: {}", e);
                None
            }
        }
    }

    /// Whether a child is currently running
    pub fn is_running(&mut self) -> bool {
        self.poll_exit();
        self.child.is_some()
    }

    /// Stop the subprocess by killing it
    pub async fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            tracing::info!("Stopping tracker subprocess (pid: {:?})", child.id());
            let _ = child.kill().await;
            let _ = child.wait().await;
        }
    }
}

/// Check if the `mediapipe` and `cv2` Python packages are available.
pub fn check_mediapipe_available() -> bool {
    match std::process::Command::new("python3")
        .args(["-c", "import mediapipe, cv2"])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
    {
        Ok(status) => status.success(),
        Err(_) => false,
    }
}
